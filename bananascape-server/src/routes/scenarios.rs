use axum::extract::Path;
use axum::Json;
use bananascape::scenarios::{self, Scenario};

use crate::ApiError;

/// `GET /scenarios`
pub async fn list_scenarios() -> Json<&'static [Scenario]> {
    Json(scenarios::all())
}

/// `GET /scenarios/{name}`
pub async fn get_scenario(Path(name): Path<String>) -> Result<Json<Scenario>, ApiError> {
    scenarios::find(&name)
        .copied()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown scenario: {name}")))
}
