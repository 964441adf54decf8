//! Visitor pattern for document tree traversal.
//!
//! # Overview
//!
//! - [`Visitor`] - Read-only traversal trait with enter/exit hooks
//! - [`walk_node`] - Visit a node, then its subtree
//! - [`walk_children`] - Traverse all children of a node
//!
//! # Example
//!
//! ```rust
//! use cubemark_ast::{Node, Span};
//! use cubemark_ast::visitor::{Visitor, VisitResult, walk_node};
//! use std::ops::ControlFlow;
//!
//! struct FirstSymbol<'a> {
//!     found: Option<&'a str>,
//! }
//!
//! impl<'a> Visitor<'a> for FirstSymbol<'a> {
//!     fn enter_node(&mut self, node: &'a Node) -> VisitResult {
//!         if node.is("symbol") {
//!             self.found = Some(node.value.as_str());
//!             return ControlFlow::Break(()); // Stop traversal
//!         }
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let mut symbol = Node::new("symbol", Span::new(0, 3));
//! symbol.value = "W".to_string();
//! let mut root = Node::new("root", Span::new(0, 3));
//! root.children.push(symbol);
//!
//! let mut finder = FirstSymbol { found: None };
//! let _ = walk_node(&mut finder, &root);
//! assert_eq!(finder.found, Some("W"));
//! ```

use std::ops::ControlFlow;

use crate::Node;

/// Result type for visitor methods to control traversal.
///
/// - `ControlFlow::Continue(())` - continue visiting
/// - `ControlFlow::Break(())` - stop traversal early
pub type VisitResult = ControlFlow<()>;

/// Visitor trait for traversing nodes without modification.
pub trait Visitor<'a>: Sized {
    /// Called before a node's children are visited.
    #[inline]
    fn enter_node(&mut self, _node: &'a Node) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Called after a node and all its children were visited.
    #[inline]
    fn exit_node(&mut self, _node: &'a Node) -> VisitResult {
        ControlFlow::Continue(())
    }
}

/// Walks a node: `enter_node`, every child, then `exit_node`.
pub fn walk_node<'a, V>(visitor: &mut V, node: &'a Node) -> VisitResult
where
    V: Visitor<'a>,
{
    visitor.enter_node(node)?;
    walk_children(visitor, node)?;
    visitor.exit_node(node)
}

/// Walks all children of a node in order.
pub fn walk_children<'a, V>(visitor: &mut V, node: &'a Node) -> VisitResult
where
    V: Visitor<'a>,
{
    for child in &node.children {
        walk_node(visitor, child)?;
    }
    ControlFlow::Continue(())
}
