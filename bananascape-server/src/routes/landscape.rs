//! Survey landscape endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use bananascape::errors::BananascapeError;
use bananascape::landscape::parse_survey_value;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::tag_request;
use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct LandscapeResponse {
    /// `/assets/...` URL of the composite image.
    pub final_image_path: String,
    pub output_dir: String,
    pub element_prompts: Vec<String>,
    pub message: &'static str,
}

/// `POST /generate-landscape` with `[{"category": ..., "score": 1-5}, ...]`
pub async fn generate_landscape(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LandscapeResponse>, ApiError> {
    let Json(body) = body?;
    let items = parse_survey_value(&body).map_err(BananascapeError::from)?;

    let (request_id, ctx) = tag_request(state.landscape.default_context());
    info!(%request_id, items = items.len(), "Survey landscape requested");

    let result = state.landscape.generate_with_context(items, &ctx).await?;

    if let Some(error) = result.error {
        return Err(ApiError::WorkflowFailed(error));
    }
    let final_path = result.final_image_path.ok_or_else(|| {
        ApiError::WorkflowFailed("Landscape finished without a final image".to_string())
    })?;
    let final_image_path = state
        .store
        .relative_url(&final_path)
        .unwrap_or_else(|| final_path.display().to_string());

    Ok(Json(LandscapeResponse {
        final_image_path,
        output_dir: result.output_dir.display().to_string(),
        element_prompts: result.element_prompts,
        message: "Landscape generation complete",
    }))
}
