//! Token events consumed by the compiler.
//!
//! A tokenizer hands the compiler a flat, well-nested sequence of
//! enter/exit events:
//!
//! ```text
//! Enter(symbol)
//!   Enter(symbolValue)
//!     Enter(data)
//!     Exit(data)
//!   Exit(symbolValue)
//! Exit(symbol)
//! ```
//!
//! Tokens carry a type name and a byte span; the text of a token is read
//! back from the document source when a handler needs it. A tokenizer that
//! resolves escapes, entities or container prefixes attaches the resolved
//! text as the token's `value` instead.

use std::borrow::Cow;

use cubemark_ast::Span;

/// An opaque unit emitted by a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Type name used to look up handlers (`symbol`, `data`, ...).
    pub token_type: Cow<'static, str>,
    /// Byte span in the document source.
    pub span: Span,
    /// Resolved text, when it differs from the source under `span`.
    pub value: Option<String>,
}

impl Token {
    /// Creates a new token.
    pub fn new(token_type: impl Into<Cow<'static, str>>, span: Span) -> Self {
        Self {
            token_type: token_type.into(),
            span,
            value: None,
        }
    }

    /// Attaches resolved text to the token.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Returns the token type name.
    #[inline]
    pub fn kind(&self) -> &str {
        &self.token_type
    }
}

/// Whether an event opens or closes a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Enter,
    Exit,
}

/// A single `(kind, token)` pair of the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub token: Token,
}

impl Event {
    /// Create an enter event.
    pub fn enter(token: Token) -> Self {
        Self {
            kind: EventKind::Enter,
            token,
        }
    }

    /// Create an exit event.
    pub fn exit(token: Token) -> Self {
        Self {
            kind: EventKind::Exit,
            token,
        }
    }
}
