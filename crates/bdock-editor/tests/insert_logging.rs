//! Log events emitted by the insertion API.

use std::sync::{Arc, Mutex};

use bdock_editor::{Attributes, BlockInserter, InsertOptions, MemoryEditor};
use bdock_registry::BlockRegistry;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct Captured {
    level: tracing::Level,
    target: String,
    fields: Vec<(String, String)>,
}

struct Capture(Arc<Mutex<Vec<Captured>>>);

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<Captured> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(Capture(events.clone()));
    tracing::subscriber::with_default(subscriber, f);
    let out = events.lock().unwrap().clone();
    out
}

fn field<'a>(event: &'a Captured, name: &str) -> Option<&'a str> {
    event
        .fields
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

#[test]
fn successful_insert_logs_block_and_position() {
    let registry = BlockRegistry::builtin();
    let mut editor = MemoryEditor::for_registry(&registry);
    let events = capture(|| {
        BlockInserter::new(&registry, &mut editor).insert(
            "core/text",
            Attributes::new(),
            InsertOptions::default(),
        );
    });
    let inserted = events
        .iter()
        .find(|e| field(e, "message") == Some("node inserted"))
        .expect("insert event");
    assert_eq!(inserted.level, tracing::Level::DEBUG);
    assert_eq!(inserted.target, "bdock.insert");
    assert_eq!(field(inserted, "block"), Some("core/text"));
    assert!(field(inserted, "index").is_some());
}

#[test]
fn unregistered_insert_logs_rejection() {
    let registry = BlockRegistry::builtin();
    let mut editor = MemoryEditor::for_registry(&registry);
    let events = capture(|| {
        BlockInserter::new(&registry, &mut editor).insert(
            "core/missing",
            Attributes::new(),
            InsertOptions::default(),
        );
    });
    assert!(events.iter().any(|e| e.target == "bdock.insert"
        && field(e, "block") == Some("core/missing")
        && field(e, "message") == Some("block type not registered")));
}
