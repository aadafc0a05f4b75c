//! Image and text generation.
//!
//! Workflows depend on the [`ImageGenerator`] and [`TextGenerator`] traits;
//! [`GeminiClient`] implements both against the REST API, and
//! [`crate::testing`] provides scripted implementations.

mod client;
mod client_tests;
pub mod models;
mod types;

pub use client::GeminiClient;
pub use types::{
    AspectRatio, GeneratedImage, ImageGenerator, ImageOptions, ImageRequest, ImageSize,
    ReferenceImage, TextGenerator,
};
