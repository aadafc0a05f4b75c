//! Configuration loaded from the environment.
//!
//! Every field has a default except the API key. The structs are plain serde
//! types, so the same configuration can also be read from JSON.

use crate::errors::BananascapeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the image service API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Image/text service settings.
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Root directory for generated assets.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            server: ServerConfig::default(),
            assets_dir: default_assets_dir(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, BananascapeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to defaults; malformed numbers are
    /// errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BananascapeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(key) = get(API_KEY_VAR) {
            config.gemini.api_key = key;
        }
        if let Some(url) = get("GEMINI_BASE_URL") {
            config.gemini.base_url = url;
        }
        if let Some(model) = get("PROGRESSION_MODEL") {
            config.gemini.progression_model = model;
        }
        if let Some(model) = get("LANDSCAPE_MODEL") {
            config.gemini.landscape_model = model;
        }
        if let Some(model) = get("PUN_MODEL") {
            config.gemini.pun_model = model;
        }
        if let Some(raw) = get("REQUEST_TIMEOUT_SECS") {
            let secs: f64 = raw.trim().parse().map_err(|_| {
                BananascapeError::Config(format!("REQUEST_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(BananascapeError::Config(format!(
                    "REQUEST_TIMEOUT_SECS must be positive, got {raw}"
                )));
            }
            config.gemini.timeout_seconds = secs;
        }
        if let Some(dir) = get("ASSETS_DIR") {
            config.assets_dir = PathBuf::from(dir);
        }
        if let Some(host) = get("HOST") {
            config.server.host = host;
        }
        if let Some(raw) = get("PORT") {
            config.server.port = raw.trim().parse().map_err(|_| {
                BananascapeError::Config(format!("PORT is not a valid port number: {raw}"))
            })?;
        }

        Ok(config)
    }
}

/// Settings for the generative image/text service.
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key sent with every request.
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Base URL of the REST API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used for the five-stage asset progression.
    #[serde(default = "default_progression_model")]
    pub progression_model: String,
    /// Model used for the composite landscape.
    #[serde(default = "default_landscape_model")]
    pub landscape_model: String,
    /// Model used for pun text.
    #[serde(default = "default_pun_model")]
    pub pun_model: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_progression_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_landscape_model() -> String {
    "gemini-3-pro-image-preview".to_string()
}

fn default_pun_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout() -> f64 {
    120.0
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            progression_model: default_progression_model(),
            landscape_model: default_landscape_model(),
            pun_model: default_pun_model(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("progression_model", &self.progression_model)
            .field("landscape_model", &self.landscape_model)
            .field("pun_model", &self.pun_model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl GeminiConfig {
    /// Creates a configuration with defaults and the given API key.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` bind address.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
