//! Compiler error types.

use thiserror::Error;

/// Errors raised while assembling a compiler from its configuration.
///
/// These abort construction before any document is processed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Two extensions registered handlers for the same token type.
    #[error("Token type '{token_type}' is claimed by both '{first}' and '{second}'")]
    ConflictingHandler {
        /// The contested token type.
        token_type: String,
        /// Extension that registered the type first.
        first: String,
        /// Extension that tried to register it again.
        second: String,
    },

    /// The extension settings could not be read.
    #[error("Invalid extension settings: {0}")]
    InvalidSettings(String),

    /// The settings named an extension that does not exist.
    #[error("Unknown extension: {0}")]
    UnknownExtension(String),
}

impl ConfigError {
    /// Creates a conflicting handler error.
    pub fn conflict(
        token_type: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::ConflictingHandler {
            token_type: token_type.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Creates an invalid settings error.
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings(message.into())
    }

    /// Creates an unknown extension error.
    pub fn unknown_extension(name: impl Into<String>) -> Self {
        Self::UnknownExtension(name.into())
    }
}

/// Structural errors raised during a compilation pass.
///
/// Each one means the token stream (or an extension handler) is malformed.
/// The pass is aborted and no tree is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// `pop` was called with no open node.
    #[error("Cannot close a node: the node stack is empty")]
    EmptyStack,

    /// A handler tried to close the document root.
    #[error("Cannot close the document root from a handler")]
    RootPopped,

    /// `resume` was called with no open buffer.
    #[error("Cannot resume: no buffer is open")]
    NoOpenBuffer,

    /// `begin` was called twice for the same open node.
    #[error("A buffer is already open for node '{node_type}'")]
    BufferAlreadyOpen { node_type: String },

    /// A node was closed while its buffer was still open.
    #[error("Node '{node_type}' was closed with its buffer still open")]
    UnresolvedBuffer { node_type: String },

    /// An exit event did not match the innermost open token.
    #[error("Unexpected exit of '{token_type}' (innermost open token: {expected:?})")]
    UnmatchedExit {
        token_type: String,
        expected: Option<String>,
    },

    /// A handler closed a node opened for a different token type.
    #[error("Exit of '{found}' tried to close a node opened by '{expected}'")]
    NodeMismatch { expected: String, found: String },

    /// The stream ended with a token still open.
    #[error("Token '{token_type}' was never closed")]
    UnclosedToken { token_type: String },

    /// The stream ended with a node still open.
    #[error("Node '{node_type}' was never closed")]
    UnclosedNode { node_type: String },

    /// A token's span does not fall on character boundaries of the source.
    #[error("Span {start}..{end} of '{token_type}' does not fall on the source text")]
    InvalidSpan {
        token_type: String,
        start: usize,
        end: usize,
    },

    /// A handler delegated to a default handler that is not registered.
    #[error("No default handler for token type '{token_type}'")]
    MissingDefault { token_type: String },
}

impl CompileError {
    /// Creates an unmatched exit error.
    pub fn unmatched_exit(token_type: impl Into<String>, expected: Option<&str>) -> Self {
        Self::UnmatchedExit {
            token_type: token_type.into(),
            expected: expected.map(str::to_string),
        }
    }
}

/// Result alias used by handlers and the compiler driver.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised by the markdown-rs event source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// markdown-rs rejected the document.
    #[error("Invalid source: {message}")]
    InvalidSource {
        /// Error message.
        message: String,
    },
}

impl SourceError {
    /// Creates a new invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
        }
    }
}
