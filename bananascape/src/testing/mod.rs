//! Testing utilities for bananascape workflows.
//!
//! This module provides scripted image and text generators that stand in for
//! the remote service.

mod mocks;

pub use mocks::{MockImageGenerator, MockTextGenerator, MOCK_IMAGE_BYTES};
