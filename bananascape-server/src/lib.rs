//! HTTP surface for bananascape.
//!
//! [`router`] builds the full application: the JSON API, static files under
//! `/assets`, permissive CORS for the browser frontend and request tracing.

#![forbid(unsafe_code)]
#![warn(clippy::all, rust_2018_idioms)]

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use bananascape::prelude::*;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared handles used by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Asset progression workflow.
    pub progression: ProgressionWorkflow,
    /// Survey landscape workflow.
    pub landscape: LandscapeWorkflow,
    /// Pun generator.
    pub puns: PunGenerator,
    /// Asset store, also used to build asset URLs.
    pub store: AssetStore,
}

impl AppState {
    /// Wires the workflows to the given generators.
    #[must_use]
    pub fn new(
        images: Arc<dyn ImageGenerator>,
        text: Arc<dyn TextGenerator>,
        config: &AppConfig,
    ) -> Self {
        let store = AssetStore::new(&config.assets_dir);
        Self {
            progression: ProgressionWorkflow::new(
                Arc::clone(&images),
                store.clone(),
                config.gemini.progression_model.clone(),
            ),
            landscape: LandscapeWorkflow::new(
                images,
                store.clone(),
                config.gemini.landscape_model.clone(),
            ),
            puns: PunGenerator::new(text).with_model(config.gemini.pun_model.clone()),
            store,
        }
    }

    /// Builds state backed by the real image service.
    pub fn from_config(config: &AppConfig) -> Result<Self, BananascapeError> {
        let client = Arc::new(GeminiClient::new(config.gemini.clone())?);
        Ok(Self::new(client.clone(), client, config))
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(state.store.root());

    routes::router()
        .nest_service("/assets", assets)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
