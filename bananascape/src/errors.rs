//! Error types for bananascape.
//!
//! The taxonomy is small: graph construction problems, survey
//! validation problems, image-service failures, and the engine's own runtime
//! failures. Failures inside a workflow stage are not errors at this level;
//! they are recorded on the workflow state and halt the loop.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for bananascape operations.
#[derive(Debug, Error)]
pub enum BananascapeError {
    /// A workflow graph failed validation at compile time.
    #[error("{0}")]
    Validation(#[from] GraphValidationError),

    /// Survey input failed validation.
    #[error("{0}")]
    Survey(#[from] SurveyValidationError),

    /// The image or text service failed.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// A subject name cannot be used as an asset directory.
    #[error("Invalid subject '{subject}': {reason}")]
    InvalidSubject {
        /// The rejected subject.
        subject: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A request field was missing or blank.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A router returned a branch key that its conditional edge does not declare.
    #[error("Node '{node}' routed to undeclared branch '{branch}'")]
    UnknownBranch {
        /// The node whose outgoing edge was evaluated.
        node: String,
        /// The branch key returned by the router.
        branch: String,
    },

    /// A workflow ran more node steps than its limit allows.
    #[error("Workflow '{graph}' exceeded the step limit of {limit}")]
    StepLimitExceeded {
        /// The graph name.
        graph: String,
        /// The configured limit.
        limit: usize,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for BananascapeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl BananascapeError {
    /// Returns true if the error was caused by caller input rather than by the
    /// service or the engine.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Survey(_) | Self::InvalidSubject { .. } | Self::InvalidInput(_)
        )
    }
}

/// Diagnostic metadata attached to graph validation errors.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphErrorInfo {
    /// Error code (e.g., "GRAPH-UNKNOWN-NODE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl GraphErrorInfo {
    /// Creates new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::json!(self.code));
        map.insert("summary".to_string(), serde_json::json!(self.summary));
        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::json!(hint));
        }
        if !self.context.is_empty() {
            map.insert("context".to_string(), serde_json::json!(self.context));
        }
        map
    }
}

/// Error raised when a workflow graph fails validation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GraphValidationError {
    /// The error message.
    pub message: String,
    /// The nodes involved in the error.
    pub nodes: Vec<String>,
    /// Optional diagnostic info.
    pub error_info: Option<GraphErrorInfo>,
}

impl GraphValidationError {
    /// Creates a new graph validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            nodes: Vec::new(),
            error_info: None,
        }
    }

    /// Sets the nodes involved.
    #[must_use]
    pub fn with_nodes(mut self, nodes: Vec<String>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Sets the diagnostic info.
    #[must_use]
    pub fn with_error_info(mut self, info: GraphErrorInfo) -> Self {
        self.error_info = Some(info);
        self
    }

    /// Returns the error code, if diagnostic info is attached.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.error_info.as_ref().map(|info| info.code.as_str())
    }
}

/// Errors raised by the image and text generation services.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("Request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the service, or the raw body.
        message: String,
    },

    /// The response carried no inline image part.
    #[error("No image returned")]
    NoImage,

    /// The response carried no text.
    #[error("No text returned")]
    EmptyText,

    /// Inline image data could not be decoded.
    #[error("Failed to decode image data: {0}")]
    Decode(String),

    /// No API key is configured.
    #[error("GOOGLE_API_KEY is not set")]
    MissingApiKey,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

/// Errors raised while validating survey input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurveyValidationError {
    /// The survey has no items.
    #[error("Survey must contain at least one item")]
    Empty,

    /// A score lies outside 1..=5.
    #[error("Score must be 1-5, got {score}")]
    ScoreOutOfRange {
        /// Position of the item in the survey, when known.
        index: Option<usize>,
        /// The rejected score.
        score: i64,
    },

    /// A category is empty or whitespace.
    #[error("Survey item {index} has a blank category")]
    BlankCategory {
        /// Position of the item in the survey.
        index: usize,
    },

    /// A survey item lacks a required field.
    #[error("Each survey item must have 'category' and 'score' (item {index} is missing '{field}')")]
    MissingField {
        /// Position of the item in the survey.
        index: usize,
        /// The missing field.
        field: &'static str,
    },

    /// Survey JSON could not be parsed.
    #[error("Invalid JSON format: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_info_creation() {
        let info = GraphErrorInfo::new("GRAPH-UNKNOWN-NODE", "Unknown node")
            .with_fix_hint("Add the node first")
            .with_context_entry("node", "generate");

        assert_eq!(info.code, "GRAPH-UNKNOWN-NODE");
        assert_eq!(info.fix_hint.as_deref(), Some("Add the node first"));
        assert_eq!(info.context.get("node"), Some(&"generate".to_string()));

        let dict = info.to_dict();
        assert_eq!(dict.get("code").unwrap(), "GRAPH-UNKNOWN-NODE");
        assert!(dict.contains_key("context"));
    }

    #[test]
    fn test_graph_validation_error_code() {
        let err = GraphValidationError::new("Graph has no nodes")
            .with_error_info(GraphErrorInfo::new("GRAPH-EMPTY", "Empty graph"));

        assert_eq!(err.code(), Some("GRAPH-EMPTY"));
        assert_eq!(err.to_string(), "Graph has no nodes");
        assert!(GraphValidationError::new("x").code().is_none());
    }

    #[test]
    fn test_generation_error_messages() {
        assert_eq!(GenerationError::NoImage.to_string(), "No image returned");
        let api = GenerationError::Api {
            status: 429,
            message: "Resource exhausted".to_string(),
        };
        assert_eq!(api.to_string(), "API error (429): Resource exhausted");
    }

    #[test]
    fn test_survey_error_messages() {
        let err = SurveyValidationError::ScoreOutOfRange {
            index: Some(1),
            score: 7,
        };
        assert_eq!(err.to_string(), "Score must be 1-5, got 7");
        assert_eq!(
            SurveyValidationError::Empty.to_string(),
            "Survey must contain at least one item"
        );
    }

    #[test]
    fn test_client_error_classification() {
        let survey: BananascapeError = SurveyValidationError::Empty.into();
        assert!(survey.is_client_error());

        let subject = BananascapeError::InvalidSubject {
            subject: "..".to_string(),
            reason: "reserved".to_string(),
        };
        assert!(subject.is_client_error());

        let generation: BananascapeError = GenerationError::NoImage.into();
        assert!(!generation.is_client_error());
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let converted: BananascapeError = err.into();
        assert!(matches!(converted, BananascapeError::Serialization(_)));
    }
}
