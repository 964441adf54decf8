//! The per-pass compile context threaded into every handler.

use cubemark_ast::{Node, Span};

use crate::buffer::BufferManager;
use crate::error::{CompileError, CompileResult};
use crate::handler::HandlerTable;
use crate::stack::NodeStack;
use crate::token::{EventKind, Token};

/// Type tag of the document root.
pub const ROOT: &str = "root";

/// Mutable state of one compilation pass.
///
/// Handlers only reach the tree through this context: the node on top of
/// the stack is the single insertion point, and text buffers are scoped to
/// open nodes. The context also carries the default document grammar so
/// extension handlers can delegate to it.
#[derive(Debug)]
pub struct CompileContext<'a> {
    source: &'a str,
    defaults: &'a HandlerTable,
    stack: NodeStack,
    buffers: BufferManager,
    /// End offset of the last byte delivered as character data.
    text_end: usize,
}

impl<'a> CompileContext<'a> {
    /// Creates a context with the document root already open.
    pub fn new(source: &'a str, defaults: &'a HandlerTable) -> Self {
        let mut stack = NodeStack::new();
        stack.push(Node::new(ROOT, Span::from(0..source.len())), ROOT);
        Self {
            source,
            defaults,
            stack,
            buffers: BufferManager::new(),
            text_end: 0,
        }
    }

    /// The document source.
    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The default document grammar.
    #[inline]
    pub fn defaults(&self) -> &'a HandlerTable {
        self.defaults
    }

    /// Returns the source text covered by a token, or `""` if the span does
    /// not fall on the source.
    pub fn slice(&self, token: &Token) -> &'a str {
        self.source.get(token.span.range()).unwrap_or_default()
    }

    /// Returns the token's resolved value, falling back to its source text.
    pub fn text<'t>(&self, token: &'t Token) -> &'t str
    where
        'a: 't,
    {
        token.value.as_deref().unwrap_or_else(|| self.slice(token))
    }

    /// Returns the currently open node.
    pub fn current(&self) -> CompileResult<&Node> {
        self.stack.current().ok_or(CompileError::EmptyStack)
    }

    /// Returns the currently open node for mutation.
    pub fn current_mut(&mut self) -> CompileResult<&mut Node> {
        self.stack.current_mut().ok_or(CompileError::EmptyStack)
    }

    /// Number of open nodes, the root included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Opens `node` as a child of the current node.
    pub fn push(&mut self, node: Node, token: &Token) {
        self.stack.push(node, token.kind());
    }

    /// Closes the current node and attaches it to its parent.
    ///
    /// `token` must be the exit token matching the one that opened the
    /// node. Its span is merged into the node's span.
    pub fn pop(&mut self, token: &Token) -> CompileResult<()> {
        match self.stack.depth() {
            0 => return Err(CompileError::EmptyStack),
            1 => return Err(CompileError::RootPopped),
            _ => {}
        }

        let opened_by = self.stack.opened_by().unwrap_or_default();
        if opened_by != token.kind() {
            return Err(CompileError::NodeMismatch {
                expected: opened_by.to_string(),
                found: token.kind().to_string(),
            });
        }

        if self.buffers.is_open_at(self.stack.depth()) {
            return Err(CompileError::UnresolvedBuffer {
                node_type: self.current()?.node_type.clone(),
            });
        }

        let node = self.current_mut()?;
        node.span = node.span.merge(&token.span);
        self.stack.close()?;
        Ok(())
    }

    /// Opens a text buffer for the current node.
    pub fn begin(&mut self) -> CompileResult<()> {
        if self.buffers.begin(self.stack.depth()) {
            return Ok(());
        }
        Err(CompileError::BufferAlreadyOpen {
            node_type: self.current()?.node_type.clone(),
        })
    }

    /// Closes the innermost text buffer and returns its contents.
    pub fn resume(&mut self) -> CompileResult<String> {
        self.buffers.resume()
    }

    /// Delivers the token's text as character data.
    ///
    /// The text goes to the innermost open buffer, or else to a trailing
    /// `text` child of the current node. Bytes already delivered by an
    /// enclosing or earlier token are skipped. A token carrying a resolved
    /// value is delivered whole, unless its span starts inside text that was
    /// already delivered.
    pub fn data(&mut self, token: &Token) -> CompileResult<()> {
        let range = token.span.range();
        if let Some(value) = token.value.as_deref() {
            if range.start < self.text_end {
                return Ok(());
            }
            self.text_end = range.end;
            return self.deliver(value, token.span);
        }

        let start = range.start.max(self.text_end);
        if start >= range.end {
            return Ok(());
        }
        let source = self.source;
        let text = source
            .get(start..range.end)
            .ok_or_else(|| CompileError::InvalidSpan {
                token_type: token.kind().to_string(),
                start: range.start,
                end: range.end,
            })?;
        self.text_end = range.end;
        self.deliver(text, Span::from(start..range.end))
    }

    /// Invokes a default grammar handler on behalf of another token.
    pub fn delegate(
        &mut self,
        kind: EventKind,
        token_type: &str,
        token: &Token,
    ) -> CompileResult<()> {
        let handlers = self
            .defaults
            .get(token_type)
            .copied()
            .ok_or_else(|| CompileError::MissingDefault {
                token_type: token_type.to_string(),
            })?;
        (handlers.get(kind))(self, token)
    }

    /// Ends the pass, returning the document root.
    pub fn finish(mut self) -> CompileResult<Node> {
        if self.stack.depth() > 1 {
            return Err(CompileError::UnclosedNode {
                node_type: self.current()?.node_type.clone(),
            });
        }
        if self.buffers.is_buffering() {
            return Err(CompileError::UnresolvedBuffer {
                node_type: ROOT.to_string(),
            });
        }
        self.stack.close()?.ok_or(CompileError::EmptyStack)
    }

    fn deliver(&mut self, text: &str, span: Span) -> CompileResult<()> {
        if text.is_empty() || self.buffers.append(text) {
            return Ok(());
        }
        let node = self.current_mut()?;
        match node.children.last_mut() {
            Some(last) if last.is("text") => {
                last.value.push_str(text);
                last.span = last.span.merge(&span);
            }
            _ => node.children.push(Node::text(text, span)),
        }
        Ok(())
    }
}
