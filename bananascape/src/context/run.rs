//! The context shared by all nodes of one workflow run.

use super::RunIdentity;
use crate::events::{EventSink, LoggingEventSink, WorkflowEvent};
use crate::utils::iso_timestamp;
use std::sync::Arc;

/// The context for a single workflow run.
///
/// Nodes receive it by reference; it carries the run's identity and the sink
/// that receives its events. Every emitted payload is enriched with the run ID,
/// the workflow name and a timestamp.
#[derive(Clone)]
pub struct RunContext {
    identity: RunIdentity,
    workflow: String,
    event_sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("identity", &self.identity)
            .field("workflow", &self.workflow)
            .finish_non_exhaustive()
    }
}

impl RunContext {
    /// Creates a run context that logs events through tracing.
    #[must_use]
    pub fn new(workflow: impl Into<String>) -> Self {
        Self {
            identity: RunIdentity::new(),
            workflow: workflow.into(),
            event_sink: Arc::new(LoggingEventSink::default()),
        }
    }

    /// Sets the run identity.
    #[must_use]
    pub fn with_identity(mut self, identity: RunIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Returns the run identity.
    #[must_use]
    pub fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    /// Returns the workflow name.
    #[must_use]
    pub fn workflow(&self) -> &str {
        &self.workflow
    }

    /// Returns the event sink.
    #[must_use]
    pub fn event_sink(&self) -> &Arc<dyn EventSink> {
        &self.event_sink
    }

    /// Emits an event enriched with the run's correlation fields.
    pub fn emit_event(&self, event_type: &str, data: Option<serde_json::Value>) {
        let mut enriched = match data {
            Some(value @ serde_json::Value::Object(_)) => value,
            Some(other) => serde_json::json!({ "value": other }),
            None => serde_json::json!({}),
        };

        if let serde_json::Value::Object(ref mut map) = enriched {
            map.insert(
                "run_id".to_string(),
                serde_json::json!(self.identity.run_id.to_string()),
            );
            if let Some(id) = self.identity.request_id {
                map.insert("request_id".to_string(), serde_json::json!(id.to_string()));
            }
            map.insert("workflow".to_string(), serde_json::json!(&self.workflow));
            map.insert("timestamp".to_string(), serde_json::json!(iso_timestamp()));
        }

        self.event_sink.emit(WorkflowEvent::new(event_type, enriched));
    }
}
