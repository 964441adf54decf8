//! Structural properties of compilation over generated event streams.

use cubemark_compiler::test_utils::StreamBuilder;
use cubemark_compiler::{Compiler, CompilerConfig, Event, EventKind};
use cubemark_extensions::{Cardlink, Centering, Symbol};
use proptest::prelude::*;

/// Token types drawn for container items: extension types, default
/// grammar types and types nothing handles.
const TOKEN_TYPES: &[&str] = &[
    "symbol",
    "symbolValue",
    "cardlink",
    "cardlinkValue",
    "centering",
    "paragraph",
    "emphasis",
    "strong",
    "blockQuote",
    "listItem",
    "codeText",
    "codeTextData",
    "spoiler",
    "mystery",
];

#[derive(Debug, Clone)]
enum Item {
    Text(String),
    Token(&'static str, Vec<Item>),
}

fn item() -> impl Strategy<Value = Item> {
    let leaf = "[a-z]{1,4}".prop_map(Item::Text);
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(TOKEN_TYPES),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(token_type, children)| Item::Token(token_type, children))
    })
}

fn append(builder: StreamBuilder, item: &Item) -> StreamBuilder {
    match item {
        Item::Text(text) => builder.data(text),
        Item::Token(token_type, children) => children
            .iter()
            .fold(builder.enter(token_type), append)
            .exit(token_type),
    }
}

fn stream() -> impl Strategy<Value = (String, Vec<Event>)> {
    prop::collection::vec(item(), 1..4)
        .prop_map(|items| items.iter().fold(StreamBuilder::new(), append).finish())
}

fn compiler() -> Compiler {
    let mut config = CompilerConfig::new();
    config
        .use_extension(&Symbol)
        .use_extension(&Cardlink)
        .use_extension(&Centering::new());
    Compiler::new(&config).unwrap()
}

proptest! {
    #[test]
    fn well_nested_streams_compile((source, events) in stream()) {
        let result = compiler().compile(&source, events);
        prop_assert!(result.is_ok(), "{:?}", result);
        prop_assert_eq!(result.unwrap().node_type, "root");
    }

    #[test]
    fn stream_missing_one_exit_fails(
        (source, mut events) in stream(),
        pick in any::<prop::sample::Index>(),
    ) {
        let exits: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.kind == EventKind::Exit)
            .map(|(index, _)| index)
            .collect();
        events.remove(*pick.get(&exits));

        prop_assert!(compiler().compile(&source, events).is_err());
    }
}
