//! Card-image extension.
//!
//! `[[!Opt]]` embeds a card image. A leading `/` in the reference marks a
//! double-faced card: `[[!/Delver of Secrets]]`.

use cubemark_compiler::{
    CompileContext, CompileResult, CompilerConfig, DelimitedSyntax, Extension, HandlerTable, Syntax,
    Token,
};

use crate::capture::{enter_value, exit_value, open_buffered};

pub const CARDIMAGE: &str = "cardimage";
pub const CARDIMAGE_VALUE: &str = "cardimageValue";

#[derive(Debug, Clone, Copy, Default)]
pub struct Cardimage;

impl Cardimage {
    pub fn syntax() -> DelimitedSyntax {
        DelimitedSyntax::inline(CARDIMAGE, "[[!", "]]")
    }

    pub fn handlers() -> HandlerTable {
        HandlerTable::new()
            .with(CARDIMAGE, enter_cardimage, exit_cardimage)
            .with(CARDIMAGE_VALUE, enter_value, exit_value)
    }
}

impl Extension for Cardimage {
    fn name(&self) -> &str {
        CARDIMAGE
    }

    fn configure(&self, config: &mut CompilerConfig) {
        config
            .add_syntax(self.name(), Syntax::Delimited(Self::syntax()))
            .add_handlers(self.name(), Self::handlers());
    }
}

fn enter_cardimage(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    open_buffered(ctx, token, CARDIMAGE)
}

fn exit_cardimage(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let captured = ctx.resume()?;
    let (id, dfc) = match captured.strip_prefix('/') {
        Some(rest) => (rest.to_string(), true),
        None => (captured, false),
    };

    let node = ctx.current_mut()?;
    node.data.set_property("id", id.as_str());
    node.data.set_property("dfc", dfc);
    node.value = id;
    ctx.pop(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubemark_ast::AttrValue;
    use cubemark_compiler::test_utils::StreamBuilder;
    use cubemark_compiler::{Compiler, MarkdownSource};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::single_faced("Opt", "Opt", false)]
    #[case::double_faced("/Delver of Secrets", "Delver of Secrets", true)]
    fn test_cardimage_properties(#[case] text: &str, #[case] id: &str, #[case] dfc: bool) {
        let mut config = CompilerConfig::new();
        config.use_extension(&Cardimage);
        let compiler = Compiler::new(&config).unwrap();

        let (source, events) = StreamBuilder::new()
            .enter(CARDIMAGE)
            .literal("[[!")
            .enter(CARDIMAGE_VALUE)
            .data(text)
            .exit(CARDIMAGE_VALUE)
            .literal("]]")
            .exit(CARDIMAGE)
            .finish();

        let root = compiler.compile(&source, events).unwrap();
        let image = &root.children[0];

        assert_eq!(image.value, id);
        assert_eq!(image.h_name(), Some("cardimage"));
        assert_eq!(image.data.h_properties.get("id"), Some(&AttrValue::from(id)));
        assert_eq!(image.data.h_properties.get("dfc"), Some(&AttrValue::Bool(dfc)));
    }

    #[test]
    fn test_cardimage_snapshot() {
        let mut config = CompilerConfig::new();
        config.use_extension(&Cardimage);
        let compiler = Compiler::new(&config).unwrap();

        let source = "[[!/Delver of Secrets]]";
        let events = MarkdownSource::new(&config).events(source).unwrap();
        let root = compiler.compile(source, events).unwrap();

        insta::assert_json_snapshot!(root.children[0].children[0], @r#"
        {
          "type": "cardimage",
          "value": "Delver of Secrets",
          "data": {
            "hName": "cardimage",
            "hProperties": {
              "dfc": true,
              "id": "Delver of Secrets"
            }
          },
          "range": {
            "start": 0,
            "end": 23
          }
        }
        "#);
    }
}
