use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use api::{process_signal, router, AppState, RequestDefaults, SignalRequest};
use common::{Bar, BarWindow, DataProvider, Error, Interval, Notifier, Result};
use strategy::{FetchConfig, SignalEngine, StrategyRegistry};

struct FakeProvider {
    healthy: bool,
}

#[async_trait]
impl DataProvider for FakeProvider {
    async fn fetch_bars(&self, symbol: &str, interval: Interval, lookback: usize) -> Result<BarWindow> {
        if !self.healthy {
            return Err(Error::DataUnavailable(format!("{symbol}: provider offline")));
        }
        let t0 = Utc.with_ymd_and_hms(2024, 6, 3, 3, 45, 0).unwrap();
        let bars = (0..lookback)
            .map(|i| {
                let base = 2_900.0 + (i as f64 * 0.45).sin() * 20.0 + i as f64 * 0.8;
                Bar {
                    timestamp: t0 + chrono::Duration::minutes(30 * i as i64),
                    open: base - 2.0,
                    high: base + 6.0,
                    low: base - 7.0,
                    close: base + 2.0,
                    volume: 10_000.0,
                }
            })
            .collect();
        BarWindow::new(symbol, interval, bars)
    }
}

/// Forwards every delivered alert into a channel.
struct ChannelNotifier {
    tx: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn deliver(&self, text: &str) {
        let _ = self.tx.send(text.to_string());
    }
}

fn state(healthy: bool) -> (AppState, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = SignalEngine::new(
        StrategyRegistry::with_all(),
        Arc::new(FakeProvider { healthy }),
        FetchConfig::default(),
    );
    let state = AppState {
        engine: Arc::new(engine),
        notifier: Arc::new(ChannelNotifier { tx }),
        defaults: RequestDefaults {
            symbol: "RELIANCE.NS".into(),
            timeframe: "30min".into(),
        },
    };
    (state, rx)
}

async fn post_webhook(state: AppState, body: &str) -> (StatusCode, Value) {
    let resp = router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn next_alert(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("alert not delivered in time")
        .expect("notifier channel closed")
}

#[tokio::test]
async fn home_reports_running() {
    let (state, _rx) = state(true);
    let resp = router(state)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "Server is running");
}

#[tokio::test]
async fn healthz_lists_strategies() {
    let (state, _rx) = state(true);
    let resp = router(state)
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["strategies"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn webhook_acknowledges_and_delivers_buy_alert() {
    let (state, mut rx) = state(true);
    let (status, body) = post_webhook(state, "HL_BOS_BUY RELIANCE.NS 30min").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let alert = next_alert(&mut rx).await;
    assert!(alert.contains("BUY SIGNAL"), "{alert}");
    assert!(alert.contains("Strategy: `HL_BOS_BUY`"), "{alert}");
    assert!(alert.contains("Symbol: `RELIANCE.NS`"), "{alert}");
}

#[tokio::test]
async fn unknown_strategy_is_reported_not_dropped() {
    let (state, mut rx) = state(true);
    let (status, _) = post_webhook(state, "nope").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(next_alert(&mut rx).await, "`Unknown` signal received: `NOPE`");
}

#[tokio::test]
async fn provider_failure_becomes_failure_alert() {
    let (state, mut rx) = state(false);
    post_webhook(state, r#"{"strategy": "BASE_BREAKOUT_BUY", "symbol": "TCS.NS"}"#).await;
    let alert = next_alert(&mut rx).await;
    assert!(alert.contains("SIGNAL FAILED"), "{alert}");
    assert!(alert.contains("provider offline"), "{alert}");
}

#[tokio::test]
async fn process_signal_returns_rendered_alert() {
    let (state, mut rx) = state(true);
    let request = SignalRequest {
        strategy: "EMA_RSI_BUY".into(),
        symbol: "INFY.NS".into(),
        timeframe: "30min".into(),
    };
    let alert = process_signal(&state, &request).await;
    assert_eq!(alert.symbol, "INFY.NS");
    assert_eq!(alert.strategy, "EMA_RSI_BUY");
    assert_eq!(next_alert(&mut rx).await, alert.text);
}
