use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::{AppState, RequestDefaults};
use common::{Config, LogNotifier, Notifier};
use market::YahooClient;
use strategy::{SignalEngine, StrategyFileConfig, StrategyRegistry};
use telegram_notify::TelegramNotifier;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(port = cfg.webhook_port, "SignalBot starting");

    let strategy_file = StrategyFileConfig::load(&cfg.strategy_config_path)
        .unwrap_or_else(|e| panic!("Failed to load {}: {e}", cfg.strategy_config_path));

    // ── Strategy registry ─────────────────────────────────────────────────────
    let registry = StrategyRegistry::from_config(&strategy_file)
        .unwrap_or_else(|e| panic!("Invalid strategy config: {e}"));
    info!(
        interval = %strategy_file.fetch.interval,
        lookback = strategy_file.fetch.lookback,
        "Bars are fetched per request"
    );

    // ── Market data ───────────────────────────────────────────────────────────
    let provider = YahooClient::new(cfg.data_timeout)
        .unwrap_or_else(|e| panic!("Failed to build market data client: {e}"));

    // ── Notifier ──────────────────────────────────────────────────────────────
    let notifier: Arc<dyn Notifier> = match &cfg.telegram {
        Some(tg) => {
            info!(chat_id = tg.chat_id, "Alerts go to Telegram");
            Arc::new(TelegramNotifier::new(tg, cfg.notify_timeout))
        }
        None => {
            warn!("TELEGRAM_BOT_TOKEN not set, alerts are only logged");
            Arc::new(LogNotifier)
        }
    };

    let engine = SignalEngine::new(registry, Arc::new(provider), strategy_file.fetch);
    let state = AppState {
        engine: Arc::new(engine),
        notifier,
        defaults: RequestDefaults {
            symbol: cfg.default_symbol.clone(),
            timeframe: cfg.default_timeframe.clone(),
        },
    };

    announce_webhook_url(&cfg.public_ip_url, cfg.webhook_port).await;

    // ── Serve until shutdown ──────────────────────────────────────────────────
    tokio::select! {
        res = api::serve(state, cfg.webhook_port) => {
            if let Err(e) = res {
                panic!("Webhook server failed: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting.");
        }
    }
}

/// Log the externally reachable webhook URL. Failure is not fatal.
async fn announce_webhook_url(ip_url: &str, port: u16) {
    let lookup = async {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?
            .get(ip_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    };
    match lookup.await {
        Ok(ip) => info!(url = %format!("http://{}:{port}/webhook", ip.trim()), "Webhook endpoint"),
        Err(e) => warn!(error = %e, port, "Could not determine public IP"),
    }
}
