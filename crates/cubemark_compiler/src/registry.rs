//! Extension registry.
//!
//! Merges the handler tables of every configured extension into one lookup
//! table, rejecting token types claimed by more than one extension.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ConfigError;
use crate::handler::{ExtensionTable, Handlers};

#[derive(Debug, Clone)]
struct Registration {
    extension: String,
    handlers: Handlers,
}

/// Conflict-checked handler lookup, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    registrations: HashMap<String, Registration>,
    extensions: Vec<String>,
}

impl ExtensionRegistry {
    /// Builds a registry from extension tables, in configuration order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConflictingHandler`] for the first token type
    /// found in two tables. A table listed twice conflicts with itself.
    pub fn build(tables: &[ExtensionTable]) -> Result<Self, ConfigError> {
        let mut registrations: HashMap<String, Registration> = HashMap::new();

        for table in tables {
            for (token_type, handlers) in table.table.iter() {
                if let Some(existing) = registrations.get(token_type) {
                    return Err(ConfigError::conflict(
                        token_type,
                        &existing.extension,
                        &table.name,
                    ));
                }
                registrations.insert(
                    token_type.to_string(),
                    Registration {
                        extension: table.name.clone(),
                        handlers: *handlers,
                    },
                );
            }
        }

        debug!(
            "Built extension registry: {} token types from {} extensions",
            registrations.len(),
            tables.len()
        );

        Ok(Self {
            registrations,
            extensions: tables.iter().map(|table| table.name.clone()).collect(),
        })
    }

    /// Looks up the handlers registered for a token type.
    #[inline]
    pub fn get(&self, token_type: &str) -> Option<&Handlers> {
        self.registrations
            .get(token_type)
            .map(|registration| &registration.handlers)
    }

    /// Returns the extension that owns a token type.
    pub fn owner(&self, token_type: &str) -> Option<&str> {
        self.registrations
            .get(token_type)
            .map(|registration| registration.extension.as_str())
    }

    /// Names of the registered extensions, in configuration order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Number of registered token types.
    #[inline]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}
