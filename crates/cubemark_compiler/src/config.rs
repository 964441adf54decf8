//! Compiler configuration.
//!
//! A [`CompilerConfig`] accumulates what extensions contribute: tokenizer
//! descriptions in `syntaxes` and handler tables in `handlers`. Both lists
//! are ordered and append-only. Nothing is deduplicated here; token type
//! conflicts surface when the registry is built.

use markdown::ParseOptions;

use crate::handler::{ExtensionTable, HandlerTable};
use crate::markdown_syntax::MarkdownSyntax;

/// A syntax extension.
///
/// `configure` receives the document configuration and appends whatever
/// the extension ships: a handler table, a tokenizer description, or both.
pub trait Extension: Send + Sync {
    /// Name used in conflict reports and settings.
    fn name(&self) -> &str;

    /// Contributes this extension's syntax and handlers.
    fn configure(&self, config: &mut CompilerConfig);
}

/// Where a delimited construct may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Opening and closing markers sit on lines of their own.
    Block,
    /// Markers appear within a run of text.
    Inline,
}

/// A marker-delimited construct.
///
/// Inline constructs produce `token_type` wrapping a `<token_type>Value`
/// token that covers the text between the markers. With no closing marker,
/// the value runs over word characters (alphanumerics, `_` and `-`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedSyntax {
    pub token_type: String,
    pub open: String,
    pub close: Option<String>,
    pub placement: Placement,
}

impl DelimitedSyntax {
    /// A block construct between `open` and `close` marker lines.
    pub fn block(
        token_type: impl Into<String>,
        open: impl Into<String>,
        close: impl Into<String>,
    ) -> Self {
        Self {
            token_type: token_type.into(),
            open: open.into(),
            close: Some(close.into()),
            placement: Placement::Block,
        }
    }

    /// An inline construct between `open` and `close` markers.
    pub fn inline(
        token_type: impl Into<String>,
        open: impl Into<String>,
        close: impl Into<String>,
    ) -> Self {
        Self {
            token_type: token_type.into(),
            open: open.into(),
            close: Some(close.into()),
            placement: Placement::Inline,
        }
    }

    /// An inline construct introduced by `open` and ending at the first
    /// non-word character. `open` only matches after a non-word character,
    /// so `a@b.com` stays text.
    pub fn inline_word(token_type: impl Into<String>, open: impl Into<String>) -> Self {
        Self {
            token_type: token_type.into(),
            open: open.into(),
            close: None,
            placement: Placement::Inline,
        }
    }

    /// Token type of the inner value span.
    pub fn value_type(&self) -> String {
        format!("{}Value", self.token_type)
    }
}

/// A tokenizer description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Syntax {
    /// A construct provided by markdown-rs.
    Markdown(MarkdownSyntax),
    /// A marker-delimited construct.
    Delimited(DelimitedSyntax),
}

/// A tokenizer description tagged with the contributing extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxEntry {
    pub extension: String,
    pub syntax: Syntax,
}

/// The document's extensible configuration object.
#[derive(Debug, Clone, Default)]
pub struct CompilerConfig {
    pub syntaxes: Vec<SyntaxEntry>,
    pub handlers: Vec<ExtensionTable>,
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets an extension contribute to this configuration.
    pub fn use_extension(&mut self, extension: &dyn Extension) -> &mut Self {
        extension.configure(self);
        self
    }

    /// Appends a tokenizer description.
    pub fn add_syntax(&mut self, extension: impl Into<String>, syntax: Syntax) -> &mut Self {
        self.syntaxes.push(SyntaxEntry {
            extension: extension.into(),
            syntax,
        });
        self
    }

    /// Appends a handler table.
    pub fn add_handlers(&mut self, extension: impl Into<String>, table: HandlerTable) -> &mut Self {
        self.handlers.push(ExtensionTable::new(extension, table));
        self
    }

    /// Iterates over the markdown-rs constructs, in contribution order.
    pub fn markdown_syntaxes(&self) -> impl Iterator<Item = &MarkdownSyntax> {
        self.syntaxes.iter().filter_map(|entry| match &entry.syntax {
            Syntax::Markdown(syntax) => Some(syntax),
            Syntax::Delimited(_) => None,
        })
    }

    /// Iterates over the delimited constructs with the given placement.
    pub fn delimited(&self, placement: Placement) -> impl Iterator<Item = &DelimitedSyntax> {
        self.syntaxes.iter().filter_map(move |entry| match &entry.syntax {
            Syntax::Delimited(syntax) if syntax.placement == placement => Some(syntax),
            _ => None,
        })
    }

    /// Folds every markdown-rs construct into CommonMark parse options.
    pub fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::default();
        for syntax in self.markdown_syntaxes() {
            syntax.apply(&mut options);
        }
        options
    }
}
