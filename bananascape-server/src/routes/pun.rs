use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct PunRequest {
    pub question: String,
    pub theme: String,
}

#[derive(Debug, Serialize)]
pub struct PunResponse {
    pub pun: String,
}

/// `POST /generate-pun` with `{"question": ..., "theme": ...}`
pub async fn generate_pun(
    State(state): State<AppState>,
    body: Result<Json<PunRequest>, JsonRejection>,
) -> Result<Json<PunResponse>, ApiError> {
    let Json(request) = body?;
    let pun = state
        .puns
        .generate_pun(&request.question, &request.theme)
        .await?;
    Ok(Json(PunResponse { pun }))
}
