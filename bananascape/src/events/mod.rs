//! Workflow events.
//!
//! The engine emits `workflow.*` and `node.*` events for every run. The
//! workflows add their own: `progression.stage_completed`,
//! `progression.stage_failed`, `landscape.final_saved` and
//! `landscape.final_failed`. A sink decides where they go.

mod sink;

use serde::Serialize;
use serde_json::Value;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// One event from a workflow run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowEvent {
    /// Dotted type, e.g. `node.completed`.
    pub event_type: String,
    /// Payload; an object once enriched by [`crate::context::RunContext`].
    pub data: Value,
}

impl WorkflowEvent {
    /// Creates an event.
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Returns a payload field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns a payload field holding a string.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// True for `*.failed` and `*_failed` events.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.event_type.ends_with(".failed") || self.event_type.ends_with("_failed")
    }
}
