use axum::routing::{get, post};
use axum::Router;
use bananascape::context::{RunContext, RunIdentity};
use uuid::Uuid;

use crate::AppState;

pub mod generate;
pub mod health;
pub mod landscape;
pub mod pun;
pub mod scenarios;

/// API routes, without static files or middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/generate", get(generate::generate))
        .route("/generate-landscape", post(landscape::generate_landscape))
        .route("/generate-pun", post(pun::generate_pun))
        .route("/scenarios", get(scenarios::list_scenarios))
        .route("/scenarios/{name}", get(scenarios::get_scenario))
}

/// Tags a workflow's run context with a fresh request ID.
pub(crate) fn tag_request(ctx: RunContext) -> (Uuid, RunContext) {
    let request_id = Uuid::new_v4();
    let ctx = ctx.with_identity(RunIdentity::new().with_request_id(request_id));
    (request_id, ctx)
}
