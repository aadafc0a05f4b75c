//! HTTP-level tests for the Gemini client against a local stub server.

#[cfg(test)]
mod tests {
    use crate::config::GeminiConfig;
    use crate::errors::GenerationError;
    use crate::genai::{
        AspectRatio, GeminiClient, ImageGenerator, ImageOptions, ImageRequest, ImageSize,
        TextGenerator,
    };
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::{Json, Router};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct Captured {
        path: String,
        api_key: Option<String>,
        body: Value,
    }

    #[derive(Clone)]
    struct Stub {
        status: StatusCode,
        reply: Value,
        seen: Arc<Mutex<Vec<Captured>>>,
    }

    async fn handle(
        State(stub): State<Stub>,
        uri: Uri,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        stub.seen.lock().push(Captured {
            path: uri.path().to_string(),
            api_key: headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
        (stub.status, Json(stub.reply.clone()))
    }

    async fn spawn_stub(status: StatusCode, reply: Value) -> (GeminiClient, Arc<Mutex<Vec<Captured>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let stub = Stub {
            status,
            reply,
            seen: seen.clone(),
        };
        let app = Router::new().fallback(handle).with_state(stub);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = GeminiConfig::with_api_key("test-key")
            .with_base_url(format!("http://{addr}/v1beta"));
        (GeminiClient::new(config).unwrap(), seen)
    }

    fn image_reply(bytes: &[u8]) -> Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Here is your image."},
                    {"inlineData": {"mimeType": "image/png", "data": STANDARD.encode(bytes)}}
                ]},
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn test_generate_image_round_trip() {
        let (client, seen) = spawn_stub(StatusCode::OK, image_reply(b"fake-png")).await;

        let image = client
            .generate_image(
                ImageRequest::new("a wide valley")
                    .with_model("gemini-3-pro-image-preview")
                    .with_options(
                        ImageOptions::new()
                            .with_aspect_ratio(AspectRatio::Wide)
                            .with_image_size(ImageSize::TwoK)
                            .image_only()
                            .with_search_grounding(),
                    ),
            )
            .await
            .unwrap();

        assert_eq!(image.bytes, b"fake-png");
        assert_eq!(image.mime_type, "image/png");

        let calls = seen.lock().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].path,
            "/v1beta/models/gemini-3-pro-image-preview:generateContent"
        );
        assert_eq!(calls[0].api_key.as_deref(), Some("test-key"));
        assert_eq!(calls[0].body["contents"][0]["parts"][0]["text"], "a wide valley");
        assert_eq!(
            calls[0].body["generationConfig"]["imageConfig"]["aspectRatio"],
            "16:9"
        );
        assert_eq!(calls[0].body["tools"][0], json!({"googleSearch": {}}));
    }

    #[tokio::test]
    async fn test_default_image_model() {
        let (client, seen) = spawn_stub(StatusCode::OK, image_reply(b"x")).await;

        client.generate_image(ImageRequest::new("tree")).await.unwrap();

        assert_eq!(
            seen.lock()[0].path,
            "/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[tokio::test]
    async fn test_text_only_reply_is_no_image() {
        let reply = json!({
            "candidates": [{"content": {"parts": [{"text": "I can't draw that."}]}}]
        });
        let (client, _) = spawn_stub(StatusCode::OK, reply).await;

        let err = client.generate_image(ImageRequest::new("x")).await.unwrap_err();
        assert!(matches!(err, GenerationError::NoImage));
    }

    #[tokio::test]
    async fn test_api_error_surfaces_service_message() {
        let reply = json!({
            "error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}
        });
        let (client, _) = spawn_stub(StatusCode::TOO_MANY_REQUESTS, reply).await;

        let err = client.generate_image(ImageRequest::new("x")).await.unwrap_err();
        match err {
            GenerationError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Resource has been exhausted");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_generate_text() {
        let reply = json!({
            "candidates": [{"content": {"parts": [{"text": "Lettuce "}, {"text": "celebrate!"}]}}]
        });
        let (client, seen) = spawn_stub(StatusCode::OK, reply).await;

        let text = client.generate_text("pun please", None).await.unwrap();

        assert_eq!(text, "Lettuce celebrate!");
        let calls = seen.lock().clone();
        assert_eq!(calls[0].path, "/v1beta/models/gemini-2.5-flash:generateContent");
        assert!(calls[0].body.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_connection_failure_is_request_error() {
        let config = GeminiConfig::with_api_key("k").with_base_url("http://127.0.0.1:1/v1beta");
        let client = GeminiClient::new(config).unwrap();

        let err = client.generate_text("x", Some("m")).await.unwrap_err();
        assert!(matches!(err, GenerationError::Request(_)));
    }
}
