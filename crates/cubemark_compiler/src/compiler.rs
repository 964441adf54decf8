//! The compiler driver.

use std::sync::Arc;

use cubemark_ast::Node;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::CompilerConfig;
use crate::context::CompileContext;
use crate::error::{CompileError, CompileResult, ConfigError};
use crate::grammar::default_handlers;
use crate::handler::{HandlerTable, Handlers};
use crate::registry::ExtensionRegistry;
use crate::token::{Event, EventKind, Token};

/// Compiles token event streams into document trees.
///
/// The registry and default grammar are immutable and shared; every call
/// to [`Compiler::compile`] runs with its own stack and buffers, so one
/// compiler can serve many documents at once.
#[derive(Debug, Clone)]
pub struct Compiler {
    registry: Arc<ExtensionRegistry>,
    defaults: Arc<HandlerTable>,
}

impl Compiler {
    /// Builds a compiler over the default document grammar.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if two extensions claim one token type.
    pub fn new(config: &CompilerConfig) -> Result<Self, ConfigError> {
        Self::with_defaults(config, default_handlers())
    }

    /// Builds a compiler over a caller-supplied default grammar.
    pub fn with_defaults(
        config: &CompilerConfig,
        defaults: HandlerTable,
    ) -> Result<Self, ConfigError> {
        let registry = ExtensionRegistry::build(&config.handlers)?;
        Ok(Self {
            registry: Arc::new(registry),
            defaults: Arc::new(defaults),
        })
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn defaults(&self) -> &HandlerTable {
        &self.defaults
    }

    /// Compiles one document.
    ///
    /// `source` is the text the token spans point into. The pass fails as a
    /// whole on the first structural error; no partial tree is returned.
    pub fn compile<I>(&self, source: &str, events: I) -> CompileResult<Node>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut count = 0usize;
        let result = self.run(source, events, &mut count);
        match &result {
            Ok(root) => debug!(
                "Compiled {} events into {} top-level nodes",
                count,
                root.children.len()
            ),
            Err(e) => debug!("Compilation failed after {} events: {}", count, e),
        }
        result
    }

    /// Compiles independent documents in parallel.
    ///
    /// Results are returned in input order.
    pub fn compile_batch<S>(&self, documents: &[(S, Vec<Event>)]) -> Vec<CompileResult<Node>>
    where
        S: AsRef<str> + Sync,
    {
        documents
            .par_iter()
            .map(|(source, events)| self.compile(source.as_ref(), events.iter().cloned()))
            .collect()
    }

    fn run<I>(&self, source: &str, events: I, count: &mut usize) -> CompileResult<Node>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut ctx = CompileContext::new(source, &self.defaults);
        let mut open: Vec<Token> = Vec::new();

        for event in events {
            *count += 1;
            trace!("{:?} {}", event.kind, event.token.kind());

            match event.kind {
                EventKind::Enter => open.push(event.token.clone()),
                EventKind::Exit => match open.last() {
                    Some(innermost) if innermost.token_type == event.token.token_type => {
                        open.pop();
                    }
                    innermost => {
                        return Err(CompileError::unmatched_exit(
                            event.token.kind(),
                            innermost.map(Token::kind),
                        ));
                    }
                },
            }

            self.dispatch(&mut ctx, &event)?;
        }

        if let Some(token) = open.last() {
            return Err(CompileError::UnclosedToken {
                token_type: token.kind().to_string(),
            });
        }

        ctx.finish()
    }

    /// Routes an event to its extension handler, falling back to the
    /// default grammar. Unregistered types pass through.
    fn dispatch(&self, ctx: &mut CompileContext<'_>, event: &Event) -> CompileResult<()> {
        let Some(handlers) = self.resolve(event.token.kind()) else {
            trace!("No handler for '{}', passing through", event.token.kind());
            return Ok(());
        };
        (handlers.get(event.kind))(ctx, &event.token)
    }

    fn resolve(&self, token_type: &str) -> Option<Handlers> {
        self.registry
            .get(token_type)
            .or_else(|| self.defaults.get(token_type))
            .copied()
    }
}
