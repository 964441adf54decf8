//! End-to-end compilation scenarios across the compiler and extensions.

use cubemark_ast::{AttrValue, Node};
use cubemark_compiler::markdown_syntax::StrikethroughOptions;
use cubemark_compiler::test_utils::StreamBuilder;
use cubemark_compiler::{
    CompileContext, CompileError, CompileResult, Compiler, CompilerConfig, ConfigError, Extension,
    HandlerTable, MarkdownSource, Token,
};
use cubemark_extensions::{
    Cardimage, Cardlink, Cardrow, Centering, Strikethrough, Symbol, Userlink,
};
use rstest::rstest;

fn all_extensions() -> CompilerConfig {
    let mut config = CompilerConfig::new();
    config
        .use_extension(&Symbol)
        .use_extension(&Cardlink)
        .use_extension(&Cardimage)
        .use_extension(&Userlink)
        .use_extension(&Centering::new())
        .use_extension(&Cardrow)
        .use_extension(&Strikethrough::default());
    config
}

fn compile_markdown(config: &CompilerConfig, source: &str) -> CompileResult<Node> {
    let compiler = Compiler::new(config).unwrap();
    let events = MarkdownSource::new(config).events(source).unwrap();
    compiler.compile(source, events)
}

mod well_formed {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::plain("Just a paragraph.")]
    #[case::heading_and_list("# Cube\n\n- [[Opt]]\n- [[Ponder]]\n\n1. {U}\n2. {W}")]
    #[case::quote("> @dekkaru says *hi*")]
    #[case::code("`[[not a link]]` and ~~old~~")]
    #[case::nested_blocks(">>>\n{{{\n[[!Opt]] [[!/Delver of Secrets]]\n}}}\n<<<")]
    #[case::rule_and_break("a  \nb\n\n---")]
    fn compiles_to_a_complete_tree(#[case] source: &str) {
        let root = compile_markdown(&all_extensions(), source).unwrap();

        assert_eq!(root.node_type, "root");
        assert_eq!(root.span.range(), 0..source.len());
    }

    #[test]
    fn inline_code_is_not_scanned_for_extensions() {
        let root = compile_markdown(&all_extensions(), "`[[not a link]]`").unwrap();

        assert!(root.find_all("cardlink").is_empty());
        assert_eq!(root.find_all("inlineCode")[0].value, "[[not a link]]");
    }

    #[test]
    fn nested_blocks_keep_structure() {
        let root = compile_markdown(
            &all_extensions(),
            ">>>\n{{{\n[[!Opt]] [[!/Delver of Secrets]]\n}}}\n<<<",
        )
        .unwrap();

        let centering = &root.children[0];
        assert_eq!(centering.node_type, "centering");
        assert_eq!(centering.children[0].node_type, "cardrow");

        let images = root.find_all("cardimage");
        assert_eq!(images.len(), 2);
        assert_eq!(
            images[1].data.h_properties.get("dfc"),
            Some(&AttrValue::Bool(true))
        );
    }
}

mod markdown_content {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::quote_markers("> a\n> b", "a\nb")]
    #[case::list_indent("- a\n  b", "a\nb")]
    #[case::escape_and_reference(r"\{W\} &amp; co", "{W} & co")]
    fn text_follows_markdown_values(#[case] source: &str, #[case] expected: &str) {
        let root = compile_markdown(&all_extensions(), source).unwrap();

        assert_eq!(root.text_content(), expected);
        assert!(root.find_all("symbol").is_empty());
    }

    #[test]
    fn fenced_code_hides_extension_markers() {
        let source = "```deck\n>>>\n{W}\n```\n\n{W}";
        let root = compile_markdown(&all_extensions(), source).unwrap();

        let code = &root.children[0];
        assert_eq!(code.node_type, "code");
        assert_eq!(code.value, ">>>\n{W}");
        assert_eq!(code.data.get("lang"), Some(&AttrValue::from("deck")));
        assert!(root.find_all("centering").is_empty());
        assert_eq!(root.find_all("symbol").len(), 1);
    }

    #[test]
    fn link_keeps_url_and_extension_label() {
        let source = "[{W} decks](https://cube.test/white)";
        let root = compile_markdown(&all_extensions(), source).unwrap();

        let link = &root.find_all("link")[0];
        assert_eq!(
            link.data.h_properties.get("url"),
            Some(&AttrValue::from("https://cube.test/white"))
        );
        assert_eq!(link.find_all("symbol")[0].value, "W");
        assert_eq!(link.text_content(), " decks");
    }
}

mod reference_extensions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn symbol_round_trip() {
        let mut config = CompilerConfig::new();
        config.use_extension(&Symbol);
        let compiler = Compiler::new(&config).unwrap();

        let (source, events) = StreamBuilder::new()
            .enter("symbol")
            .enter("symbolValue")
            .data("W")
            .exit("symbolValue")
            .exit("symbol")
            .finish();
        let root = compiler.compile(&source, events).unwrap();
        let symbol = &root.children[0];

        assert_eq!(symbol.node_type, "symbol");
        assert_eq!(symbol.value, "W");
        assert_eq!(symbol.h_name(), Some("symbol"));
        assert_eq!(symbol.data.get("value"), Some(&AttrValue::from("W")));
    }

    #[test]
    fn cardlink_has_no_data_value() {
        let mut config = CompilerConfig::new();
        config.use_extension(&Cardlink);
        let compiler = Compiler::new(&config).unwrap();

        let (source, events) = StreamBuilder::new()
            .enter("cardlink")
            .enter("cardlinkValue")
            .data("Black Lotus")
            .exit("cardlinkValue")
            .exit("cardlink")
            .finish();
        let root = compiler.compile(&source, events).unwrap();
        let link = &root.children[0];

        assert_eq!(link.node_type, "cardlink");
        assert_eq!(link.value, "Black Lotus");
        assert_eq!(link.h_name(), Some("cardlink"));
        assert!(link.data.get("value").is_none());
    }

    #[test]
    fn symbol_snapshot() {
        let mut config = CompilerConfig::new();
        config.use_extension(&Symbol);
        let root = compile_markdown(&config, "{W}").unwrap();

        insta::assert_json_snapshot!(root, @r#"
        {
          "type": "root",
          "children": [
            {
              "type": "paragraph",
              "children": [
                {
                  "type": "symbol",
                  "value": "W",
                  "data": {
                    "hName": "symbol",
                    "value": "W"
                  },
                  "range": {
                    "start": 0,
                    "end": 3
                  }
                }
              ],
              "range": {
                "start": 0,
                "end": 3
              }
            }
          ],
          "range": {
            "start": 0,
            "end": 3
          }
        }
        "#);
    }
}

mod configuration_errors {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Mana;

    fn enter_mana(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
        ctx.push(Node::new("mana", token.span), token);
        Ok(())
    }

    fn exit_mana(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
        ctx.pop(token)
    }

    impl Extension for Mana {
        fn name(&self) -> &str {
            "mana"
        }

        fn configure(&self, config: &mut CompilerConfig) {
            config.add_handlers(
                self.name(),
                HandlerTable::new().with("symbol", enter_mana, exit_mana),
            );
        }
    }

    #[test]
    fn conflicting_extensions_fail_before_compiling() {
        let mut config = CompilerConfig::new();
        config.use_extension(&Symbol).use_extension(&Mana);

        assert_eq!(
            Compiler::new(&config).unwrap_err(),
            ConfigError::conflict("symbol", "symbol", "mana")
        );
    }

    #[test]
    fn conflict_is_order_sensitive_only_in_its_message() {
        let mut config = CompilerConfig::new();
        config.use_extension(&Mana).use_extension(&Symbol);

        let error = Compiler::new(&config).unwrap_err();
        assert_eq!(error, ConfigError::conflict("symbol", "mana", "symbol"));
        assert!(error.to_string().contains("'mana'"));
    }
}

mod structural_errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exit_without_enter_produces_no_tree() {
        let mut config = CompilerConfig::new();
        config.use_extension(&Symbol);
        let compiler = Compiler::new(&config).unwrap();

        let (source, events) = StreamBuilder::new().data("x").exit("symbol").finish();

        assert_eq!(
            compiler.compile(&source, events),
            Err(CompileError::unmatched_exit("symbol", None))
        );
    }

    #[test]
    fn unclosed_symbol_produces_no_tree() {
        let mut config = CompilerConfig::new();
        config.use_extension(&Symbol);
        let compiler = Compiler::new(&config).unwrap();

        let (source, events) = StreamBuilder::new()
            .enter("paragraph")
            .enter("symbol")
            .text("symbolValue", "W")
            .exit("paragraph")
            .finish();

        assert_eq!(
            compiler.compile(&source, events),
            Err(CompileError::unmatched_exit("paragraph", Some("symbol")))
        );
    }

    #[test]
    fn stray_value_token_reads_as_text() {
        let mut config = CompilerConfig::new();
        config.use_extension(&Symbol);
        let compiler = Compiler::new(&config).unwrap();

        let (source, events) = StreamBuilder::new()
            .enter("paragraph")
            .text("symbolValue", "W")
            .exit("paragraph")
            .finish();
        let root = compiler.compile(&source, events).unwrap();

        assert_eq!(root.text_content(), "W");
    }
}

mod buffering {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_buffers_resume_independently() {
        let mut config = CompilerConfig::new();
        config.use_extension(&Cardlink).use_extension(&Symbol);
        let compiler = Compiler::new(&config).unwrap();

        let (source, events) = StreamBuilder::new()
            .enter("cardlink")
            .literal("[[")
            .enter("cardlinkValue")
            .data("Fire ")
            .exit("cardlinkValue")
            .enter("symbol")
            .literal("{")
            .enter("symbolValue")
            .data("R")
            .exit("symbolValue")
            .literal("}")
            .exit("symbol")
            .enter("cardlinkValue")
            .data(" Ice")
            .exit("cardlinkValue")
            .literal("]]")
            .exit("cardlink")
            .finish();

        let root = compiler.compile(&source, events).unwrap();
        let link = &root.children[0];

        assert_eq!(link.value, "Fire  Ice");
        assert_eq!(link.children.len(), 1);
        assert_eq!(link.children[0].node_type, "symbol");
        assert_eq!(link.children[0].value, "R");
    }
}

mod independence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::double("~~gone~~ stays")]
    #[case::single("a ~b~ c")]
    #[case::nested("**~~bold gone~~**")]
    fn unused_extensions_do_not_change_the_tree(#[case] source: &str) {
        let mut only_strikethrough = CompilerConfig::new();
        only_strikethrough.use_extension(&Strikethrough::new(StrikethroughOptions::default()));

        let mut with_others = CompilerConfig::new();
        with_others
            .use_extension(&Symbol)
            .use_extension(&Cardlink)
            .use_extension(&Centering::new())
            .use_extension(&Strikethrough::new(StrikethroughOptions::default()));

        let alone = compile_markdown(&only_strikethrough, source).unwrap();
        let together = compile_markdown(&with_others, source).unwrap();

        assert!(!alone.find_all("delete").is_empty());
        assert_eq!(alone, together);
    }
}

mod parallel {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn batch_matches_sequential_compilation() {
        let config = all_extensions();
        let compiler = Compiler::new(&config).unwrap();
        let markdown = MarkdownSource::new(&config);

        let documents: Vec<(String, Vec<_>)> = (0..32)
            .map(|i| {
                let source = format!("# Deck {i}\n\n[[Card {i}]] costs {{{i}}}");
                let events = markdown.events(&source).unwrap();
                (source, events)
            })
            .collect();

        let batch = compiler.compile_batch(&documents);
        for ((source, events), result) in documents.iter().zip(batch) {
            let sequential = compiler.compile(source, events.clone()).unwrap();
            assert_eq!(result.unwrap(), sequential);
        }
    }

    #[test]
    fn compiler_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Compiler>();
    }
}
