//! Text buffers for nodes whose value is only known when they close.
//!
//! `begin` opens a buffer scoped to the node currently open; character data
//! delivered while a buffer is open goes into the innermost buffer instead of
//! the tree. `resume` closes that buffer and returns its text, which makes
//! the enclosing buffer (if any) the target again.

use crate::error::{CompileError, CompileResult};

#[derive(Debug)]
struct Buffer {
    /// Node stack depth of the owning node.
    depth: usize,
    text: String,
}

/// A stack of text buffers mirroring the node stack.
#[derive(Debug, Default)]
pub struct BufferManager {
    buffers: Vec<Buffer>,
}

impl BufferManager {
    /// Creates a manager with no open buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a buffer for the node at `depth`.
    ///
    /// Returns false (and opens nothing) if that node already has one.
    pub fn begin(&mut self, depth: usize) -> bool {
        if self.is_open_at(depth) {
            return false;
        }
        self.buffers.push(Buffer {
            depth,
            text: String::new(),
        });
        true
    }

    /// Closes the innermost buffer and returns its text.
    pub fn resume(&mut self) -> CompileResult<String> {
        self.buffers
            .pop()
            .map(|buffer| buffer.text)
            .ok_or(CompileError::NoOpenBuffer)
    }

    /// Appends character data to the innermost buffer.
    ///
    /// Returns false when no buffer is open; the caller then attaches the
    /// text to the tree.
    pub fn append(&mut self, text: &str) -> bool {
        match self.buffers.last_mut() {
            Some(buffer) => {
                buffer.text.push_str(text);
                true
            }
            None => false,
        }
    }

    /// Returns true if the node at `depth` owns the innermost buffer.
    pub fn is_open_at(&self, depth: usize) -> bool {
        self.buffers.last().is_some_and(|buffer| buffer.depth == depth)
    }

    /// Returns true if any buffer is open.
    #[inline]
    pub fn is_buffering(&self) -> bool {
        !self.buffers.is_empty()
    }

    /// Number of open buffers.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
