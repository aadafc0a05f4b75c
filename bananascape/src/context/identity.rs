//! Run identity for tracking workflow executions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a workflow run with correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIdentity {
    /// The unique ID for this workflow run.
    pub run_id: Uuid,

    /// The request that triggered the run, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl RunIdentity {
    /// Creates a new run identity with a time-ordered run ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::now_v7(),
            request_id: None,
        }
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_identities_are_unique() {
        let a = RunIdentity::new();
        let b = RunIdentity::new();
        assert_ne!(a.run_id, b.run_id);
        assert!(a.request_id.is_none());
    }

    #[test]
    fn test_request_id_serialization() {
        let request_id = Uuid::new_v4();
        let identity = RunIdentity::new().with_request_id(request_id);

        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["request_id"], serde_json::json!(request_id.to_string()));

        let bare = serde_json::to_value(RunIdentity::new()).unwrap();
        assert!(bare.get("request_id").is_none());
    }
}
