//! Injectable sink for join and scale diagnostics.
//!
//! The join engine reports misses, duplicate keys and missing codes here
//! instead of logging directly, so its results stay a pure function of its
//! inputs and tests can inspect what was reported.

use std::sync::Mutex;

pub type Fields<'a> = &'a [(&'static str, String)];

pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, event: &'static str, fields: Fields<'_>);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _event: &'static str, _fields: Fields<'_>) {}
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, event: &'static str, fields: Fields<'_>) {
        tracing::debug!(target: "census_map::diagnostics", event, ?fields);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

impl Event {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self { Self::default() }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events().iter().filter(|event| event.name == name).count()
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, event: &'static str, fields: Fields<'_>) {
        if let Ok(mut events) = self.events.lock() {
            events.push(Event { name: event, fields: fields.to_vec() });
        }
    }
}
