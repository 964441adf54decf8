//! Centering extension.
//!
//! A composite extension: it ships its own block syntax, a `>>>` line
//! opening and a `<<<` line closing the block, together with the handlers
//! that turn the block into a `centering` container.

use cubemark_compiler::{
    CompileContext, CompileResult, CompilerConfig, DelimitedSyntax, Extension, HandlerTable, Syntax,
    Token,
};

use crate::capture::{close_container, open_container};

pub const CENTERING: &str = "centering";

/// Centers its block content.
#[derive(Debug, Clone)]
pub struct Centering {
    open: String,
    close: String,
}

impl Centering {
    pub fn new() -> Self {
        Self::with_markers(">>>", "<<<")
    }

    /// Uses custom opening and closing marker lines.
    pub fn with_markers(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Opening marker line.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// Closing marker line.
    pub fn close(&self) -> &str {
        &self.close
    }

    pub fn handlers() -> HandlerTable {
        HandlerTable::new().with(CENTERING, enter_centering, close_container)
    }
}

impl Default for Centering {
    fn default() -> Self {
        Self::new()
    }
}

impl Extension for Centering {
    fn name(&self) -> &str {
        CENTERING
    }

    fn configure(&self, config: &mut CompilerConfig) {
        let syntax = DelimitedSyntax::block(CENTERING, self.open.as_str(), self.close.as_str());
        config
            .add_syntax(self.name(), Syntax::Delimited(syntax))
            .add_handlers(self.name(), Self::handlers());
    }
}

fn enter_centering(ctx: &mut CompileContext<'_>, token: &Token) -> CompileResult<()> {
    open_container(ctx, token, CENTERING);
    Ok(())
}
