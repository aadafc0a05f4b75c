//! Scripted generators for testing workflows without network access.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::errors::GenerationError;
use crate::genai::{GeneratedImage, ImageGenerator, ImageRequest, TextGenerator};

/// Placeholder bytes returned by [`MockImageGenerator`]. They carry a PNG
/// signature but are not a decodable image.
pub const MOCK_IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nmock-image";

/// An image generator that records requests and returns scripted results.
///
/// Calls are numbered from 1. Unscripted calls succeed with
/// [`MOCK_IMAGE_BYTES`].
#[derive(Debug, Default)]
pub struct MockImageGenerator {
    requests: Mutex<Vec<ImageRequest>>,
    failures: Mutex<HashMap<usize, GenerationError>>,
    fail_all: Mutex<Option<GenerationError>>,
}

impl MockImageGenerator {
    /// Creates a generator that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator that fails every call with `error`.
    #[must_use]
    pub fn failing(error: GenerationError) -> Self {
        let mock = Self::default();
        *mock.fail_all.lock() = Some(error);
        mock
    }

    /// Makes call number `call` fail with `error`.
    #[must_use]
    pub fn fail_on_call(self, call: usize, error: GenerationError) -> Self {
        self.failures.lock().insert(call, error);
        self
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().clone()
    }

    /// Returns the prompts received, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.prompt.clone()).collect()
    }

    /// Clears recorded requests.
    pub fn reset(&self) {
        self.requests.lock().clear();
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate_image(
        &self,
        request: ImageRequest,
    ) -> Result<GeneratedImage, GenerationError> {
        let call = {
            let mut requests = self.requests.lock();
            requests.push(request);
            requests.len()
        };

        if let Some(error) = self.fail_all.lock().clone() {
            return Err(error);
        }
        if let Some(error) = self.failures.lock().get(&call).cloned() {
            return Err(error);
        }
        Ok(GeneratedImage::new(MOCK_IMAGE_BYTES.to_vec(), "image/png"))
    }
}

/// A text generator that records prompts and returns a fixed reply.
#[derive(Debug)]
pub struct MockTextGenerator {
    reply: Result<String, GenerationError>,
    prompts: Mutex<Vec<String>>,
    models: Mutex<Vec<Option<String>>>,
}

impl MockTextGenerator {
    /// Creates a generator replying with `reply`.
    #[must_use]
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            prompts: Mutex::new(Vec::new()),
            models: Mutex::new(Vec::new()),
        }
    }

    /// Creates a generator failing with `error`.
    #[must_use]
    pub fn failing(error: GenerationError) -> Self {
        Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
            models: Mutex::new(Vec::new()),
        }
    }

    /// Returns the prompts received.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Returns the model override passed with each call.
    #[must_use]
    pub fn models(&self) -> Vec<Option<String>> {
        self.models.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate_text(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, GenerationError> {
        self.prompts.lock().push(prompt.to_string());
        self.models.lock().push(model.map(str::to_string));
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_image_generator_scripted_failure() {
        let mock = MockImageGenerator::new().fail_on_call(2, GenerationError::NoImage);

        assert!(mock.generate_image(ImageRequest::new("one")).await.is_ok());
        assert!(matches!(
            mock.generate_image(ImageRequest::new("two")).await,
            Err(GenerationError::NoImage)
        ));
        assert!(mock.generate_image(ImageRequest::new("three")).await.is_ok());

        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.prompts(), vec!["one", "two", "three"]);

        mock.reset();
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_image_generator_always_failing() {
        let mock = MockImageGenerator::failing(GenerationError::Request("offline".into()));
        let err = mock.generate_image(ImageRequest::new("x")).await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed: offline");
    }

    #[tokio::test]
    async fn test_mock_text_generator_records_calls() {
        let mock = MockTextGenerator::replying("pun");
        let text = mock.generate_text("prompt", Some("m")).await.unwrap();

        assert_eq!(text, "pun");
        assert_eq!(mock.prompts(), vec!["prompt"]);
        assert_eq!(mock.models(), vec![Some("m".to_string())]);
    }
}
