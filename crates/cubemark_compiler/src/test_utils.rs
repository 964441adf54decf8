//! Test utilities for cubemark_compiler.

use cubemark_ast::Span;

use crate::grammar::DATA;
use crate::token::{Event, Token};

/// Builds an event stream together with the source text its spans point
/// into.
///
/// Enter tokens carry an empty span at the current end of the source; the
/// matching exit token spans everything appended in between.
///
/// ```rust
/// use cubemark_compiler::test_utils::StreamBuilder;
///
/// let (source, events) = StreamBuilder::new()
///     .enter("symbol")
///     .literal("{")
///     .enter("symbolValue")
///     .data("W")
///     .exit("symbolValue")
///     .literal("}")
///     .exit("symbol")
///     .finish();
///
/// assert_eq!(source, "{W}");
/// assert_eq!(events.len(), 6);
/// ```
#[derive(Debug, Default)]
pub struct StreamBuilder {
    source: String,
    events: Vec<Event>,
    open: Vec<(String, usize)>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a token.
    pub fn enter(mut self, token_type: &str) -> Self {
        let offset = self.source.len();
        self.events
            .push(Event::enter(Token::new(token_type.to_string(), Span::from(offset..offset))));
        self.open.push((token_type.to_string(), offset));
        self
    }

    /// Closes the innermost open token of this type.
    ///
    /// Closing a type that is not open emits an exit with an empty span,
    /// which lets tests build malformed streams.
    pub fn exit(mut self, token_type: &str) -> Self {
        let end = self.source.len();
        let start = match self.open.iter().rposition(|(open, _)| open == token_type) {
            Some(index) => self.open.remove(index).1,
            None => end,
        };
        self.events
            .push(Event::exit(Token::new(token_type.to_string(), Span::from(start..end))));
        self
    }

    /// Appends `text` wrapped in a `data` token.
    pub fn data(self, text: &str) -> Self {
        self.text(DATA, text)
    }

    /// Appends `text` wrapped in a token of the given type.
    pub fn text(self, token_type: &str, text: &str) -> Self {
        self.enter(token_type).literal(text).exit(token_type)
    }

    /// Appends source text without emitting events.
    pub fn literal(mut self, text: &str) -> Self {
        self.source.push_str(text);
        self
    }

    /// Returns the source text and the event stream.
    pub fn finish(self) -> (String, Vec<Event>) {
        (self.source, self.events)
    }
}
