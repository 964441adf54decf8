//! Strikethrough extension.
//!
//! Wraps GFM strikethrough: the grammar comes from markdown-rs and the
//! handler table from the prebuilt mdast mapping. Nothing here builds
//! nodes itself.

use cubemark_compiler::markdown_syntax::{self, StrikethroughOptions};
use cubemark_compiler::{CompilerConfig, Extension, Syntax, mdast};

pub use cubemark_compiler::mdast::STRIKETHROUGH;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Strikethrough {
    options: StrikethroughOptions,
}

impl Strikethrough {
    pub fn new(options: StrikethroughOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> StrikethroughOptions {
        self.options
    }
}

impl Extension for Strikethrough {
    fn name(&self) -> &str {
        STRIKETHROUGH
    }

    fn configure(&self, config: &mut CompilerConfig) {
        config
            .add_syntax(
                self.name(),
                Syntax::Markdown(markdown_syntax::strikethrough(self.options)),
            )
            .add_handlers(self.name(), mdast::strikethrough());
    }
}
