//! # BananaScape
//!
//! Staged image-generation workflows built on a small typed workflow graph.
//!
//! Two pipelines ship with the crate:
//!
//! - **Asset progression**: five images of one subject, from its bleakest to its
//!   most radiant form, each stage using the previous image as a visual reference.
//! - **Survey landscape**: a list of scored survey items turned into element
//!   descriptions and composited into one wide landscape image.
//!
//! Both run on [`graph::CompiledGraph`], which executes named nodes over a state
//! value, following direct and conditional edges until the graph ends.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bananascape::prelude::*;
//! use std::sync::Arc;
//!
//! let config = AppConfig::from_env()?;
//! let client = Arc::new(GeminiClient::new(config.gemini.clone())?);
//! let store = AssetStore::new(&config.assets_dir);
//!
//! let workflow = ProgressionWorkflow::new(client, store, config.gemini.progression_model.clone());
//! let state = workflow.generate_asset_progression("tree").await?;
//! assert_eq!(state.image_paths.len(), 5);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod genai;
pub mod graph;
pub mod landscape;
pub mod observability;
pub mod progression;
pub mod pun;
pub mod scenarios;
pub mod storage;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AppConfig, GeminiConfig, ServerConfig};
    pub use crate::context::{RunContext, RunIdentity};
    pub use crate::errors::{
        BananascapeError, GenerationError, GraphValidationError, SurveyValidationError,
    };
    pub use crate::events::{
        CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, WorkflowEvent,
    };
    pub use crate::genai::{
        AspectRatio, GeminiClient, GeneratedImage, ImageGenerator, ImageOptions, ImageRequest,
        ImageSize, ReferenceImage, TextGenerator,
    };
    pub use crate::graph::{CompiledGraph, GraphBuilder, GraphRun, Node, Target};
    pub use crate::landscape::{LandscapeState, LandscapeWorkflow, Score, SurveyItem};
    pub use crate::progression::{AssetState, ProgressionWorkflow};
    pub use crate::pun::PunGenerator;
    pub use crate::scenarios::Scenario;
    pub use crate::storage::AssetStore;
}
