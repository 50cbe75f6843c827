use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
}

async fn home() -> Json<Value> {
    Json(json!({ "status": "Server is running" }))
}

/// Health check endpoint. Lists the strategies this process accepts.
async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "strategies": state.engine.registry().ids(),
    }))
}
