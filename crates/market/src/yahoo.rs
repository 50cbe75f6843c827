use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use common::{Bar, BarWindow, DataProvider, Error, Interval, Result};

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Historical bars from the Yahoo Finance chart API.
pub struct YahooClient {
    base_url: String,
    http: Client,
}

impl YahooClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; signalbot)")
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl DataProvider for YahooClient {
    async fn fetch_bars(&self, symbol: &str, interval: Interval, lookback: usize) -> Result<BarWindow> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let range = range_for(interval);
        debug!(symbol, interval = %interval, range, "Requesting Yahoo chart");

        let resp = self
            .http
            .get(&url)
            .query(&[("interval", interval_code(interval)), ("range", range)])
            .send()
            .await
            .map_err(|e| Error::DataUnavailable(format!("{symbol}: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::DataUnavailable(format!("{symbol}: {e}")))?;

        if !status.is_success() {
            // Yahoo reports unknown symbols as 404 with a JSON error body
            let detail = chart_error(&body).unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::DataUnavailable(format!("{symbol}: {detail}")));
        }

        parse_chart(symbol, interval, &body, lookback)
    }
}

/// Yahoo's code for `interval`.
fn interval_code(interval: Interval) -> &'static str {
    match interval {
        Interval::H1 => "60m",
        other => other.as_str(),
    }
}

/// Smallest range that comfortably covers a default lookback at `interval`.
///
/// Intraday history is capped by Yahoo (1m: 7 days, up to 30m: 60 days).
fn range_for(interval: Interval) -> &'static str {
    match interval {
        Interval::M1 => "5d",
        Interval::M5 | Interval::M15 | Interval::M30 => "1mo",
        Interval::H1 => "3mo",
        Interval::D1 => "1y",
        Interval::W1 => "5y",
    }
}

// ─── Chart JSON parsing ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn chart_error(body: &str) -> Option<String> {
    let envelope: ChartEnvelope = serde_json::from_str(body).ok()?;
    envelope
        .chart
        .error
        .map(|e| format!("{}: {}", e.code, e.description))
}

/// Convert a chart response into a window of the latest `lookback` bars.
///
/// Rows with a missing or malformed price are skipped, as are timestamps
/// that move backwards. Yahoo repeats the live bar at the end of some
/// responses; the later copy replaces the earlier one.
fn parse_chart(symbol: &str, interval: Interval, body: &str, lookback: usize) -> Result<BarWindow> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| Error::DataUnavailable(format!("{symbol}: malformed chart response: {e}")))?;

    if let Some(err) = envelope.chart.error {
        return Err(Error::DataUnavailable(format!(
            "{symbol}: {}: {}",
            err.code, err.description
        )));
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| Error::DataUnavailable(format!("{symbol}: empty chart result")))?;
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| Error::DataUnavailable(format!("{symbol}: no quote data")))?;

    let mut bars: Vec<Bar> = Vec::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let row = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = row else {
            skipped += 1;
            continue;
        };
        let Some(timestamp) = Utc.timestamp_opt(ts, 0).single() else {
            skipped += 1;
            continue;
        };
        let bar = Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume: at(&quote.volume, i).unwrap_or(0.0),
        };
        if let Err(e) = bar.validate() {
            debug!(symbol, error = %e, "Skipping malformed chart row");
            skipped += 1;
            continue;
        }
        match bars.last_mut() {
            // A repeated timestamp is a fresher update of the same bar
            Some(last) if last.timestamp == timestamp => *last = bar,
            Some(last) if last.timestamp > timestamp => skipped += 1,
            _ => bars.push(bar),
        }
    }

    if skipped > 0 {
        warn!(symbol, skipped, "Dropped incomplete chart rows");
    }

    let start = bars.len().saturating_sub(lookback);
    let bars = bars.split_off(start);
    BarWindow::new(symbol, interval, bars)
}

fn at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten().filter(|v| v.is_finite())
}
