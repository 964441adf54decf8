//! # cubemark_ast
//!
//! Document tree definitions for cubemark.
//!
//! This crate provides the tree handed from the compiler to a renderer.
//! Nodes are mdast-shaped: a string `type` tag, an optional text `value`,
//! ordered `children`, and a `data` object carrying render hints
//! (`hName`, `hProperties`) plus free-form fields.
//!
//! ## Example
//!
//! ```rust
//! use cubemark_ast::{Node, Span};
//!
//! let mut symbol = Node::new("symbol", Span::new(0, 3)).with_h_name("symbol");
//! symbol.value = "W".to_string();
//! symbol.data.set("value", "W");
//!
//! assert_eq!(symbol.h_name(), Some("symbol"));
//! ```

mod node;
mod span;
pub mod visitor;

pub use node::{AttrValue, Node, NodeData};
pub use span::Span;

// Re-export commonly used visitor items for convenience
pub use visitor::{VisitResult, Visitor};
