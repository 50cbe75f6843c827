use axum::{extract::State, routing::post, Json, Router};
use chrono::Local;
use serde_json::{json, Value};
use tracing::{info, warn};

use common::Alert;
use strategy::{render_failure, render_plan, AlertContext};

use crate::{AppState, SignalRequest};

pub fn webhook_router() -> Router<AppState> {
    Router::new().route("/webhook", post(webhook))
}

/// Accept a signal request and process it in the background.
///
/// Always answers `{"status": "ok"}` immediately; the outcome is reported
/// through the notifier.
async fn webhook(State(state): State<AppState>, body: String) -> Json<Value> {
    let request = SignalRequest::parse(&body, &state.defaults);
    info!(
        strategy = %request.strategy,
        symbol = %request.symbol,
        timeframe = %request.timeframe,
        "Webhook received"
    );

    tokio::spawn(async move {
        process_signal(&state, &request).await;
    });

    Json(json!({ "status": "ok" }))
}

/// Evaluate one request, render the result and hand it to the notifier.
///
/// Every request produces exactly one alert, success or failure.
pub async fn process_signal(state: &AppState, request: &SignalRequest) -> Alert {
    let ctx = AlertContext {
        strategy: &request.strategy,
        symbol: &request.symbol,
        timeframe: &request.timeframe,
        timestamp: Local::now().naive_local(),
    };

    let alert = match state
        .engine
        .evaluate(&request.strategy, &request.symbol, &request.timeframe)
        .await
    {
        Ok(plan) => render_plan(&plan, ctx),
        Err(e) => {
            warn!(
                strategy = %request.strategy,
                symbol = %request.symbol,
                error = %e,
                "Signal evaluation failed"
            );
            render_failure(ctx, &e)
        }
    };

    state.notifier.deliver(&alert.text).await;
    alert
}
