//! Handler tables.
//!
//! A handler table maps a token type name to an `{enter, exit}` pair of
//! plain functions. Extensions contribute tables; the default document
//! grammar is itself one.

use std::collections::BTreeMap;

use crate::context::CompileContext;
use crate::error::CompileResult;
use crate::token::{EventKind, Token};

/// A single enter or exit handler.
pub type Handle = fn(&mut CompileContext<'_>, &Token) -> CompileResult<()>;

/// The handler pair registered for one token type.
#[derive(Debug, Clone, Copy)]
pub struct Handlers {
    pub enter: Handle,
    pub exit: Handle,
}

impl Handlers {
    pub const fn new(enter: Handle, exit: Handle) -> Self {
        Self { enter, exit }
    }

    /// Returns the handler for the given event kind.
    #[inline]
    pub fn get(&self, kind: EventKind) -> Handle {
        match kind {
            EventKind::Enter => self.enter,
            EventKind::Exit => self.exit,
        }
    }
}

/// Handler that does nothing.
pub fn noop(_ctx: &mut CompileContext<'_>, _token: &Token) -> CompileResult<()> {
    Ok(())
}

/// A mapping from token type name to [`Handlers`].
#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    entries: BTreeMap<String, Handlers>,
}

impl HandlerTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler pair, builder style.
    pub fn with(mut self, token_type: impl Into<String>, enter: Handle, exit: Handle) -> Self {
        self.insert(token_type, Handlers::new(enter, exit));
        self
    }

    /// Adds a handler pair, returning the one it replaced.
    pub fn insert(
        &mut self,
        token_type: impl Into<String>,
        handlers: Handlers,
    ) -> Option<Handlers> {
        self.entries.insert(token_type.into(), handlers)
    }

    /// Looks up the handlers for a token type.
    #[inline]
    pub fn get(&self, token_type: &str) -> Option<&Handlers> {
        self.entries.get(token_type)
    }

    #[inline]
    pub fn contains(&self, token_type: &str) -> bool {
        self.entries.contains_key(token_type)
    }

    /// Iterates over entries in token type order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Handlers)> {
        self.entries.iter().map(|(name, handlers)| (name.as_str(), handlers))
    }

    /// Returns the registered token type names.
    pub fn token_types(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A handler table tagged with the name of the extension that owns it.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    /// Extension name, used in conflict reports.
    pub name: String,
    pub table: HandlerTable,
}

impl ExtensionTable {
    pub fn new(name: impl Into<String>, table: HandlerTable) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}
