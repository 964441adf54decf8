//! Card-link extension.
//!
//! `[[Black Lotus]]` becomes a `cardlink` node whose value is the card
//! reference resolved later by the renderer.

use cubemark_compiler::{
    CompileContext, CompileResult, CompilerConfig, DelimitedSyntax, Extension, HandlerTable, Syntax,
    Token,
};

use crate::capture::{enter_value, exit_value, open_buffered};

pub const CARDLINK: &str = "cardlink";
pub const CARDLINK_VALUE: &str = "cardlinkValue";

/// Links to a card by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cardlink;

impl Cardlink {
    pub fn syntax() -> DelimitedSyntax {
        DelimitedSyntax::inline(CARDLINK, "[[", "]]")
    }

    pub fn handlers() -> HandlerTable {
        HandlerTable::new()
            .with(CARDLINK, enter_cardlink, exit_cardlink)
            .with(CARDLINK_VALUE, enter_value, exit_value)
    }
}

impl Extension for Cardlink {
    fn name(&self) -> &str {
        CARDLINK
    }

    fn configure(&self, config: &mut CompilerConfig) {
        config
            .add_syntax(self.name(), Syntax::Delimited(Self::syntax()))
            .add_handlers(self.name(), Self::handlers());
    }
}

fn enter_cardlink(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    open_buffered(ctx, token, CARDLINK)
}

fn exit_cardlink(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    let value = ctx.resume()?;
    ctx.current_mut()?.value = value;
    ctx.pop(token)
}
