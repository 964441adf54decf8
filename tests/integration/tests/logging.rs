use std::sync::{Arc, Mutex};

use cubemark_compiler::test_utils::StreamBuilder;
use cubemark_compiler::{Compiler, CompilerConfig};
use cubemark_extensions::{Cardlink, Symbol};
use tracing_subscriber::prelude::*;

/// Collects every log message emitted while installed.
#[derive(Clone, Default)]
struct LogCollector(Arc<Mutex<Vec<String>>>);

impl LogCollector {
    fn count(&self, needle: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|message| message.contains(needle))
            .count()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCollector {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(visitor.0);
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            use std::fmt::Write;
            let _ = write!(self.0, "{:?}", value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }
}

#[test]
fn test_compile_logs_registry_pass_through_and_outcome() {
    let collector = LogCollector::default();
    let subscriber = tracing_subscriber::registry().with(collector.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut config = CompilerConfig::new();
        config.use_extension(&Symbol).use_extension(&Cardlink);
        let compiler = Compiler::new(&config).unwrap();

        let (source, events) = StreamBuilder::new()
            .enter("paragraph")
            .enter("spoiler")
            .data("hidden")
            .exit("spoiler")
            .exit("paragraph")
            .finish();
        compiler.compile(&source, events).unwrap();

        let (source, events) = StreamBuilder::new().exit("symbol").finish();
        assert!(compiler.compile(&source, events).is_err());
    });

    assert_eq!(
        collector.count("Built extension registry: 4 token types from 2 extensions"),
        1
    );
    // Enter and exit of the unknown token.
    assert_eq!(collector.count("No handler for 'spoiler'"), 2);
    assert_eq!(collector.count("Compiled 6 events"), 1);
    assert_eq!(collector.count("Compilation failed after 1 events"), 1);
}
