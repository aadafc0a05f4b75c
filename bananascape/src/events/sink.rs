//! Where workflow events end up.

use parking_lot::RwLock;
use tracing::{debug, info, warn, Level};

use super::WorkflowEvent;

/// Receives the events of a workflow run.
///
/// Nodes emit from inside the run loop, so sinks must not block.
pub trait EventSink: Send + Sync {
    /// Accepts one event.
    fn emit(&self, event: WorkflowEvent);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _event: WorkflowEvent) {}
}

/// Writes events to the tracing log.
///
/// Failure events always go out at `WARN`; the rest use the configured level.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Logs at `level`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Logs at `DEBUG`, for noisy runs like large surveys.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl EventSink for LoggingEventSink {
    fn emit(&self, event: WorkflowEvent) {
        let workflow = event.str_field("workflow").unwrap_or("-");
        let node = event.str_field("node").unwrap_or("-");
        let kind = event.event_type.as_str();

        if event.is_failure() {
            warn!(event = kind, workflow, node, data = %event.data, "workflow event");
        } else if self.level == Level::DEBUG {
            debug!(event = kind, workflow, node, data = %event.data, "workflow event");
        } else {
            info!(event = kind, workflow, node, "workflow event");
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<WorkflowEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    #[must_use]
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.read().clone()
    }

    /// Event types so far, in order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events
            .read()
            .iter()
            .map(|e| e.event_type.clone())
            .collect()
    }

    /// Events whose type starts with `prefix`.
    #[must_use]
    pub fn events_of_type(&self, prefix: &str) -> Vec<WorkflowEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Number of events so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True before the first event.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Drops all events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&self, event: WorkflowEvent) {
        self.events.write().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_noop_and_logging_sinks_accept_events() {
        NoOpEventSink.emit(WorkflowEvent::new("node.started", json!({})));

        let sink = LoggingEventSink::debug();
        sink.emit(WorkflowEvent::new("node.started", json!({"node": "generate"})));
        sink.emit(WorkflowEvent::new("progression.stage_failed", json!({"stage": 2})));
        LoggingEventSink::default().emit(WorkflowEvent::new("workflow.completed", json!(null)));
    }

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.emit(WorkflowEvent::new("workflow.started", json!({})));
        sink.emit(WorkflowEvent::new("node.started", json!({"node": "initialize"})));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.event_types(), vec!["workflow.started", "node.started"]);
        assert_eq!(sink.events()[1].str_field("node"), Some("initialize"));
    }

    #[test]
    fn test_collecting_sink_filter_and_clear() {
        let sink = CollectingEventSink::new();
        sink.emit(WorkflowEvent::new("node.started", json!({})));
        sink.emit(WorkflowEvent::new("node.completed", json!({})));
        sink.emit(WorkflowEvent::new("landscape.final_saved", json!({})));

        assert_eq!(sink.events_of_type("node.").len(), 2);
        assert_eq!(sink.events_of_type("landscape.").len(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }
}
