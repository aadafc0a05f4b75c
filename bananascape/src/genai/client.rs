//! REST client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::models::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageConfig, Part, Tool,
};
use super::types::{GeneratedImage, ImageGenerator, ImageRequest, TextGenerator};
use crate::config::GeminiConfig;
use crate::errors::GenerationError;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for image and text generation.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingApiKey`] when the key is blank.
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Sends a raw `generateContent` request.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let url = self.endpoint(model);
        debug!(model, url = %url, "Calling generateContent");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(status, &body);
            warn!(model, status = status.as_u16(), error = %message, "generateContent failed");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GenerationError::Request(format!("Malformed response body: {e}")))
    }
}

fn api_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if !envelope.error.message.is_empty() {
            return envelope.error.message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Builds the wire request for an image generation call.
pub(crate) fn build_image_request(request: &ImageRequest) -> GenerateContentRequest {
    let mut parts = vec![Part::text(&request.prompt)];
    if let Some(reference) = &request.reference {
        parts.push(Part::inline(
            &reference.mime_type,
            STANDARD.encode(&reference.bytes),
        ));
    }

    let options = &request.options;
    let modalities = if options.image_only {
        vec!["IMAGE".to_string()]
    } else {
        vec!["TEXT".to_string(), "IMAGE".to_string()]
    };
    let image_config = if options.aspect_ratio.is_some() || options.image_size.is_some() {
        Some(ImageConfig {
            aspect_ratio: options.aspect_ratio.map(|r| r.as_str().to_string()),
            image_size: options.image_size.map(|s| s.as_str().to_string()),
        })
    } else {
        None
    };

    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        generation_config: Some(GenerationConfig {
            response_modalities: modalities,
            image_config,
        }),
        tools: if options.search_grounding {
            vec![Tool::google_search()]
        } else {
            Vec::new()
        },
    }
}

/// Pulls the first inline image out of a response.
pub(crate) fn extract_image(
    response: &GenerateContentResponse,
) -> Result<GeneratedImage, GenerationError> {
    let blob = response.first_inline_data().ok_or_else(|| {
        if let Some(reason) = response.block_reason() {
            debug!(reason, "Prompt blocked");
        }
        GenerationError::NoImage
    })?;
    let bytes = STANDARD
        .decode(blob.data.as_bytes())
        .map_err(|e| GenerationError::Decode(e.to_string()))?;
    Ok(GeneratedImage::new(bytes, blob.mime_type.clone()))
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_image(
        &self,
        request: ImageRequest,
    ) -> Result<GeneratedImage, GenerationError> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.progression_model.clone());
        let body = build_image_request(&request);
        let response = self.generate_content(&model, &body).await?;
        extract_image(&response)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, GenerationError> {
        let model = model.unwrap_or(&self.config.pun_model);
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            ..GenerateContentRequest::default()
        };
        let response = self.generate_content(model, &body).await?;
        response.text().ok_or(GenerationError::EmptyText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::{AspectRatio, ImageOptions, ImageSize, ReferenceImage};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_requires_api_key() {
        let err = GeminiClient::new(GeminiConfig::default()).unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
        assert!(GeminiClient::new(GeminiConfig::with_api_key("k")).is_ok());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client =
            GeminiClient::new(GeminiConfig::with_api_key("k").with_base_url("http://x/v1beta/"))
                .unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash-image"),
            "http://x/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn test_build_progression_request() {
        let request = ImageRequest::new("stage two")
            .with_reference(ReferenceImage::png(b"png-bytes".to_vec()));
        let body = serde_json::to_value(build_image_request(&request)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "stage two");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], STANDARD.encode(b"png-bytes"));
        assert_eq!(
            body["generationConfig"]["responseModalities"],
            serde_json::json!(["TEXT", "IMAGE"])
        );
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_build_landscape_request() {
        let request = ImageRequest::new("wide").with_options(
            ImageOptions::new()
                .with_aspect_ratio(AspectRatio::Wide)
                .with_image_size(ImageSize::TwoK)
                .image_only()
                .with_search_grounding(),
        );
        let body = serde_json::to_value(build_image_request(&request)).unwrap();

        assert_eq!(
            body["generationConfig"],
            serde_json::json!({
                "responseModalities": ["IMAGE"],
                "imageConfig": {"aspectRatio": "16:9", "imageSize": "2K"}
            })
        );
        assert_eq!(body["tools"], serde_json::json!([{"googleSearch": {}}]));
    }

    #[test]
    fn test_extract_image_decodes_base64() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/jpeg", "data": STANDARD.encode([1u8, 2, 3])}}
            ]}}]
        }))
        .unwrap();

        let image = extract_image(&response).unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_extract_image_missing() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "I cannot draw that"}]}}]
        }))
        .unwrap();
        assert!(matches!(
            extract_image(&response),
            Err(GenerationError::NoImage)
        ));
    }

    #[test]
    fn test_extract_image_bad_base64() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": "!!not base64!!"}}
            ]}}]
        }))
        .unwrap();
        assert!(matches!(
            extract_image(&response),
            Err(GenerationError::Decode(_))
        ));
    }

    #[test]
    fn test_api_error_message_prefers_envelope() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            api_error_message(StatusCode::TOO_MANY_REQUESTS, body),
            "Quota exceeded"
        );
        assert_eq!(
            api_error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
        assert_eq!(
            api_error_message(StatusCode::SERVICE_UNAVAILABLE, ""),
            "Service Unavailable"
        );
    }
}
