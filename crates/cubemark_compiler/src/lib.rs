//! # cubemark_compiler
//!
//! Extensible token-to-tree compiler for cubemark markdown.
//!
//! This crate provides:
//! - The compiler driver that turns enter/exit token events into a tree
//! - The extension registry and handler tables
//! - The default document grammar
//! - Compiler configuration and the `Extension` trait
//! - A markdown-rs backed event source
//!
//! ## Architecture
//!
//! A tokenizer emits a flat stream of well-nested enter/exit events. The
//! compiler routes each event to the handler pair registered for the
//! token's type: extension handlers first, then the default grammar. Token
//! types nobody handles pass through untouched. Handlers build the tree
//! through a [`CompileContext`], which owns the stack of open nodes and
//! the text buffers of one pass.
//!
//! ## Features
//!
//! - `test-utils`: Expose [`test_utils::StreamBuilder`] for building event
//!   streams by hand
//!
//! ## Example
//!
//! ```rust
//! use cubemark_compiler::{Compiler, CompilerConfig, MarkdownSource};
//!
//! let config = CompilerConfig::new();
//! let compiler = Compiler::new(&config).unwrap();
//!
//! let source = "Hello *world*";
//! let events = MarkdownSource::new(&config).events(source).unwrap();
//! let root = compiler.compile(source, events).unwrap();
//!
//! assert_eq!(root.children[0].node_type, "paragraph");
//! ```

mod buffer;
mod compiler;
mod config;
mod context;
mod error;
pub mod grammar;
mod handler;
pub mod markdown_syntax;
pub mod mdast;
mod registry;
mod source;
mod stack;
mod token;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use buffer::BufferManager;
pub use compiler::Compiler;
pub use config::{CompilerConfig, DelimitedSyntax, Extension, Placement, Syntax, SyntaxEntry};
pub use context::{CompileContext, ROOT};
pub use error::{CompileError, CompileResult, ConfigError, SourceError};
pub use handler::{ExtensionTable, Handle, HandlerTable, Handlers, noop};
pub use registry::ExtensionRegistry;
pub use source::MarkdownSource;
pub use stack::NodeStack;
pub use token::{Event, EventKind, Token};
