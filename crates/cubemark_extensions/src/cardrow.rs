//! Card-row extension.
//!
//! Lays out the card images between a `{{{` line and a `}}}` line side by
//! side. Like centering it ships its block syntax with its handlers.

use cubemark_compiler::{
    CompileContext, CompileResult, CompilerConfig, DelimitedSyntax, Extension, HandlerTable, Syntax,
    Token,
};

use crate::capture::{close_container, open_container};

pub const CARDROW: &str = "cardrow";

#[derive(Debug, Clone, Copy, Default)]
pub struct Cardrow;

impl Cardrow {
    pub fn syntax() -> DelimitedSyntax {
        DelimitedSyntax::block(CARDROW, "{{{", "}}}")
    }

    pub fn handlers() -> HandlerTable {
        HandlerTable::new().with(CARDROW, enter_cardrow, close_container)
    }
}

impl Extension for Cardrow {
    fn name(&self) -> &str {
        CARDROW
    }

    fn configure(&self, config: &mut CompilerConfig) {
        config
            .add_syntax(self.name(), Syntax::Delimited(Self::syntax()))
            .add_handlers(self.name(), Self::handlers());
    }
}

fn enter_cardrow(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    open_container(ctx, token, CARDROW);
    Ok(())
}
