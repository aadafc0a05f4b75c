//! Asset progression endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::tag_request;
use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub thing: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub thing: String,
    /// Saved files, as paths on the server.
    pub image_paths: Vec<String>,
    /// The same files as `/assets/...` URLs.
    pub image_urls: Vec<String>,
    pub output_dir: String,
    pub message: &'static str,
}

/// `GET /generate?thing=<subject>`
pub async fn generate(
    State(state): State<AppState>,
    params: Result<Query<GenerateParams>, QueryRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Query(params) = params?;
    let (request_id, ctx) = tag_request(state.progression.default_context());
    info!(%request_id, thing = %params.thing, "Asset progression requested");

    let result = state
        .progression
        .generate_with_context(&params.thing, &ctx)
        .await?;

    if let Some(error) = result.error {
        return Err(ApiError::WorkflowFailed(error));
    }

    let image_urls = result
        .image_paths
        .iter()
        .filter_map(|p| state.store.relative_url(p))
        .collect();

    Ok(Json(GenerateResponse {
        thing: result.thing,
        image_paths: result
            .image_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        image_urls,
        output_dir: result.output_dir.display().to_string(),
        message: "Generation complete",
    }))
}
