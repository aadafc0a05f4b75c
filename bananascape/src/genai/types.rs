//! Request and response types for image/text generation, independent of the
//! wire format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::GenerationError;

/// Output aspect ratio for generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1
    #[serde(rename = "1:1")]
    Square,
    /// 16:9
    #[serde(rename = "16:9")]
    Wide,
    /// 9:16
    #[serde(rename = "9:16")]
    Tall,
    /// 4:3
    #[serde(rename = "4:3")]
    Standard,
}

impl AspectRatio {
    /// Returns the ratio as the service expects it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Wide => "16:9",
            Self::Tall => "9:16",
            Self::Standard => "4:3",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output resolution tier for generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    /// 1K
    #[serde(rename = "1K")]
    OneK,
    /// 2K
    #[serde(rename = "2K")]
    TwoK,
    /// 4K
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    /// Returns the size as the service expects it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneK => "1K",
            Self::TwoK => "2K",
            Self::FourK => "4K",
        }
    }
}

/// Generation options for one image request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
    /// Requested aspect ratio; the model default when unset.
    pub aspect_ratio: Option<AspectRatio>,
    /// Requested size tier; the model default when unset.
    pub image_size: Option<ImageSize>,
    /// Ask for image output only, with no accompanying text.
    pub image_only: bool,
    /// Allow the model to ground the image in web search results.
    pub search_grounding: bool,
}

impl ImageOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the aspect ratio.
    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Sets the size tier.
    #[must_use]
    pub fn with_image_size(mut self, size: ImageSize) -> Self {
        self.image_size = Some(size);
        self
    }

    /// Requests image-only output.
    #[must_use]
    pub fn image_only(mut self) -> Self {
        self.image_only = true;
        self
    }

    /// Enables search grounding.
    #[must_use]
    pub fn with_search_grounding(mut self) -> Self {
        self.search_grounding = true;
        self
    }
}

/// An image sent alongside the prompt as a visual reference.
#[derive(Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub mime_type: String,
}

impl ReferenceImage {
    /// Creates a PNG reference image.
    #[must_use]
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "image/png".to_string(),
        }
    }
}

impl fmt::Debug for ReferenceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A single image generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Text prompt.
    pub prompt: String,
    /// Optional reference image, sent after the prompt.
    pub reference: Option<ReferenceImage>,
    /// Generation options.
    pub options: ImageOptions,
    /// Model override; the generator's default when unset.
    pub model: Option<String>,
}

impl ImageRequest {
    /// Creates a request with default options.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            reference: None,
            options: ImageOptions::default(),
            model: None,
        }
    }

    /// Attaches a reference image.
    #[must_use]
    pub fn with_reference(mut self, reference: ReferenceImage) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Sets the options.
    #[must_use]
    pub fn with_options(mut self, options: ImageOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// An image returned by the service.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Decoded image bytes.
    pub bytes: Vec<u8>,
    /// MIME type reported by the service.
    pub mime_type: String,
}

impl GeneratedImage {
    /// Creates a generated image.
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Whether the image is already PNG encoded.
    #[must_use]
    pub fn is_png(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case("image/png")
    }
}

impl fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Produces images from prompts.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one image.
    async fn generate_image(&self, request: ImageRequest)
        -> Result<GeneratedImage, GenerationError>;
}

/// Produces text from prompts.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for a prompt, optionally overriding the model.
    async fn generate_text(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ImageRequest::new("a tree")
            .with_reference(ReferenceImage::png(vec![1, 2, 3]))
            .with_options(
                ImageOptions::new()
                    .with_aspect_ratio(AspectRatio::Wide)
                    .with_image_size(ImageSize::TwoK)
                    .image_only()
                    .with_search_grounding(),
            )
            .with_model("m");

        assert_eq!(request.prompt, "a tree");
        assert_eq!(request.model.as_deref(), Some("m"));
        assert_eq!(request.options.aspect_ratio, Some(AspectRatio::Wide));
        assert!(request.options.image_only);
        assert!(request.options.search_grounding);
        assert_eq!(request.reference.unwrap().mime_type, "image/png");
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!(AspectRatio::Wide.as_str(), "16:9");
        assert_eq!(ImageSize::TwoK.as_str(), "2K");
        assert_eq!(serde_json::to_string(&AspectRatio::Tall).unwrap(), "\"9:16\"");
    }

    #[test]
    fn test_debug_hides_bytes() {
        let image = GeneratedImage::new(vec![0; 4096], "image/png");
        let debug = format!("{image:?}");
        assert!(debug.contains("4096"));
        assert!(image.is_png());
    }
}
