//! Grammar providers backed by markdown-rs constructs.
//!
//! Extensions that wrap a construct markdown-rs already knows do not ship
//! a tokenizer of their own; they contribute a [`MarkdownSyntax`] that
//! switches the construct on when parse options are assembled.

use markdown::ParseOptions;
use serde::{Deserialize, Serialize};

/// Options recognised by the strikethrough grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct StrikethroughOptions {
    /// Whether `~one~` strikes through, in addition to `~~two~~`.
    pub single_tilde: bool,
}

impl Default for StrikethroughOptions {
    fn default() -> Self {
        Self { single_tilde: true }
    }
}

/// A markdown-rs construct switched on by an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownSyntax {
    /// GFM strikethrough.
    Strikethrough(StrikethroughOptions),
}

impl MarkdownSyntax {
    /// Applies this construct to markdown-rs parse options.
    pub fn apply(&self, options: &mut ParseOptions) {
        match self {
            MarkdownSyntax::Strikethrough(strikethrough) => {
                options.constructs.gfm_strikethrough = true;
                options.gfm_strikethrough_single_tilde = strikethrough.single_tilde;
            }
        }
    }
}

/// Strikethrough grammar provider.
pub fn strikethrough(options: StrikethroughOptions) -> MarkdownSyntax {
    MarkdownSyntax::Strikethrough(options)
}
