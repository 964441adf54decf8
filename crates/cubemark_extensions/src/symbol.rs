//! Symbol extension.
//!
//! `{W}` becomes a `symbol` node whose value is the glyph key. The key is
//! also exposed as `data.value` so a renderer can read it either way.

use cubemark_compiler::{
    CompileContext, CompileResult, CompilerConfig, DelimitedSyntax, Extension, HandlerTable, Syntax,
    Token,
};

use crate::capture::{enter_value, exit_value, open_buffered};

pub const SYMBOL: &str = "symbol";
pub const SYMBOL_VALUE: &str = "symbolValue";

/// Inline glyph keys such as mana costs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Symbol;

impl Symbol {
    /// The `{key}` tokenizer description.
    pub fn syntax() -> DelimitedSyntax {
        DelimitedSyntax::inline(SYMBOL, "{", "}")
    }

    pub fn handlers() -> HandlerTable {
        HandlerTable::new()
            .with(SYMBOL, enter_symbol, exit_symbol)
            .with(SYMBOL_VALUE, enter_value, exit_value)
    }
}

impl Extension for Symbol {
    fn name(&self) -> &str {
        SYMBOL
    }

    fn configure(&self, config: &mut CompilerConfig) {
        config
            .add_syntax(self.name(), Syntax::Delimited(Self::syntax()))
            .add_handlers(self.name(), Self::handlers());
    }
}

fn enter_symbol(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    open_buffered(ctx, token, SYMBOL)
}

fn exit_symbol(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let value = ctx.resume()?;
    let node = ctx.current_mut()?;
    node.data.set("value", value.as_str());
    node.value = value;
    ctx.pop(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubemark_ast::AttrValue;
    use cubemark_compiler::Compiler;
    use cubemark_compiler::test_utils::StreamBuilder;
    use pretty_assertions::assert_eq;

    fn compiler() -> Compiler {
        let mut config = CompilerConfig::new();
        config.use_extension(&Symbol);
        Compiler::new(&config).unwrap()
    }

    #[test]
    fn test_symbol_value_round_trip() {
        let (source, events) = StreamBuilder::new()
            .enter(SYMBOL)
            .enter(SYMBOL_VALUE)
            .data("W")
            .exit(SYMBOL_VALUE)
            .exit(SYMBOL)
            .finish();

        let root = compiler().compile(&source, events).unwrap();
        let symbol = &root.children[0];

        assert_eq!(symbol.node_type, "symbol");
        assert_eq!(symbol.value, "W");
        assert_eq!(symbol.h_name(), Some("symbol"));
        assert_eq!(symbol.data.get("value"), Some(&AttrValue::from("W")));
        assert!(symbol.children.is_empty());
    }

    #[test]
    fn test_value_token_without_nested_data() {
        let (source, events) = StreamBuilder::new()
            .enter(SYMBOL)
            .literal("{")
            .text(SYMBOL_VALUE, "2/U")
            .literal("}")
            .exit(SYMBOL)
            .finish();

        let root = compiler().compile(&source, events).unwrap();
        assert_eq!(root.children[0].value, "2/U");
        assert_eq!(root.children[0].span.len(), 5);
    }

    #[test]
    fn test_symbol_inside_paragraph_keeps_siblings() {
        let (source, events) = StreamBuilder::new()
            .enter("paragraph")
            .data("Costs ")
            .enter(SYMBOL)
            .literal("{")
            .enter(SYMBOL_VALUE)
            .data("G")
            .exit(SYMBOL_VALUE)
            .literal("}")
            .exit(SYMBOL)
            .data(" only")
            .exit("paragraph")
            .finish();

        let root = compiler().compile(&source, events).unwrap();
        let types: Vec<_> = root.children[0]
            .children
            .iter()
            .map(|node| node.node_type.as_str())
            .collect();

        assert_eq!(types, vec!["text", "symbol", "text"]);
        assert_eq!(root.children[0].text_content(), "Costs  only");
    }
}
