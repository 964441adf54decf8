//! The stack of open nodes.
//!
//! The stack holds the in-progress path from the document root to the node
//! currently being built. Nodes are owned by the stack while open; closing a
//! node moves it into its parent's children, so sibling order follows the
//! order in which nodes close.

use cubemark_ast::Node;

use crate::error::{CompileError, CompileResult};

#[derive(Debug)]
struct OpenNode {
    node: Node,
    /// Token type whose enter handler opened this node.
    opened_by: String,
}

/// Ancestor chain of the node under construction.
///
/// The last element is the insertion point for new children and the target
/// of in-progress mutation.
#[derive(Debug, Default)]
pub struct NodeStack {
    open: Vec<OpenNode>,
}

impl NodeStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `node` as a child of the current top, or as the document root
    /// when the stack is empty.
    pub fn push(&mut self, node: Node, opened_by: impl Into<String>) {
        self.open.push(OpenNode {
            node,
            opened_by: opened_by.into(),
        });
    }

    /// Removes and returns the current top without attaching it anywhere.
    pub fn pop(&mut self) -> CompileResult<Node> {
        self.open
            .pop()
            .map(|entry| entry.node)
            .ok_or(CompileError::EmptyStack)
    }

    /// Closes the current top.
    ///
    /// The node is appended to its parent's children. When the closed node
    /// was the root, it is returned instead.
    pub fn close(&mut self) -> CompileResult<Option<Node>> {
        let node = self.pop()?;
        match self.open.last_mut() {
            Some(parent) => {
                parent.node.children.push(node);
                Ok(None)
            }
            None => Ok(Some(node)),
        }
    }

    /// Returns the currently open node.
    #[inline]
    pub fn current(&self) -> Option<&Node> {
        self.open.last().map(|entry| &entry.node)
    }

    /// Returns the currently open node for mutation.
    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut Node> {
        self.open.last_mut().map(|entry| &mut entry.node)
    }

    /// Returns the token type that opened the current node.
    #[inline]
    pub fn opened_by(&self) -> Option<&str> {
        self.open.last().map(|entry| entry.opened_by.as_str())
    }

    /// Number of open nodes.
    #[inline]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
