//! Renders trade plans and evaluation failures into alert text.
//!
//! Output uses Telegram's legacy Markdown: values sit inside backticks so
//! underscores in identifiers are not read as emphasis.

use chrono::NaiveDateTime;

use common::{Alert, Error, TradePlan};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifiers attached to every alert.
#[derive(Debug, Clone, Copy)]
pub struct AlertContext<'a> {
    pub strategy: &'a str,
    pub symbol: &'a str,
    pub timeframe: &'a str,
    pub timestamp: NaiveDateTime,
}

impl AlertContext<'_> {
    fn into_alert(self, text: String) -> Alert {
        Alert {
            symbol: self.symbol.to_string(),
            timeframe: self.timeframe.to_string(),
            strategy: self.strategy.to_string(),
            timestamp: self.timestamp,
            text,
        }
    }
}

/// Render a buy alert for `plan`.
pub fn render_plan(plan: &TradePlan, ctx: AlertContext<'_>) -> Alert {
    let text = format!(
        "🚀 *BUY SIGNAL*\n\
         Strategy: `{strategy}`\n\
         Symbol: `{symbol}`\n\
         Timeframe: `{timeframe}`\n\
         Timestamp: `{timestamp}`\n\
         Live Price: `{price:.2}`\n\
         \n\
         🎯 Entry: `{entry:.2}` | Target: `{target:.2}` | Stoploss: `{stop:.2}`\n\
         📈 Target Diff: `{target_pct:.2}%`\n\
         📉 Stoploss Diff: `{stop_pct:.2}%`",
        strategy = ctx.strategy,
        symbol = ctx.symbol,
        timeframe = ctx.timeframe,
        timestamp = ctx.timestamp.format(TIMESTAMP_FORMAT),
        price = plan.reference_price,
        entry = plan.entry,
        target = plan.target,
        stop = plan.stop,
        target_pct = plan.target_pct(),
        stop_pct = plan.stop_pct(),
    );
    ctx.into_alert(text)
}

/// Render a descriptive alert for a request that produced no plan.
pub fn render_failure(ctx: AlertContext<'_>, err: &Error) -> Alert {
    let text = match err {
        Error::UnknownStrategy(id) => {
            format!("`Unknown` signal received: `{}`", sanitize(id))
        }
        other => format!(
            "⚠️ *SIGNAL FAILED*\n\
             Strategy: `{strategy}`\n\
             Symbol: `{symbol}`\n\
             Timeframe: `{timeframe}`\n\
             Timestamp: `{timestamp}`\n\
             Reason: `{reason}`",
            strategy = sanitize(ctx.strategy),
            symbol = sanitize(ctx.symbol),
            timeframe = sanitize(ctx.timeframe),
            timestamp = ctx.timestamp.format(TIMESTAMP_FORMAT),
            reason = sanitize(&other.to_string()),
        ),
    };
    ctx.into_alert(text)
}

/// Strip backticks so caller-supplied text cannot close a code span.
fn sanitize(s: &str) -> String {
    s.replace('`', "'")
}
