//! Structured log capture for test assertions.
//!
//! [`capture_logs`] installs a thread-local subscriber, so it works for plain
//! tests and for `#[tokio::test]` on the default current-thread runtime.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};

/// A captured log event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

type Storage = Arc<Mutex<Vec<LogEntry>>>;

struct CaptureLayer {
    storage: Storage,
}

#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let value = format!("{value:?}");
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        self.storage.lock().push(LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

/// Captured events for the lifetime of the guard. Dumps them to stderr when
/// the test panics.
pub struct LogCapture {
    storage: Storage,
    _guard: DefaultGuard,
}

impl LogCapture {
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.storage.lock().clone()
    }

    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.storage
            .lock()
            .iter()
            .any(|entry| entry.message.contains(message))
    }

    #[must_use]
    pub fn count_at(&self, level: Level) -> usize {
        self.storage
            .lock()
            .iter()
            .filter(|entry| entry.level == level)
            .count()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.count_at(Level::WARN) > 0
    }
}

impl Drop for LogCapture {
    fn drop(&mut self) {
        if std::thread::panicking() {
            for entry in self.storage.lock().iter() {
                eprintln!(
                    "[{}] {}: {} {:?}",
                    entry.level, entry.target, entry.message, entry.fields
                );
            }
        }
    }
}

/// Capture every event at `debug` and above on the current thread.
#[must_use]
pub fn capture_logs() -> LogCapture {
    let storage = Storage::default();
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(CaptureLayer {
            storage: Arc::clone(&storage),
        });
    LogCapture {
        storage,
        _guard: tracing::subscriber::set_default(subscriber),
    }
}
