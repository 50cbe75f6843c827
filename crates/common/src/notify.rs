use async_trait::async_trait;
use tracing::info;

/// Outbound channel for rendered alert text.
///
/// Delivery is best-effort: implementations log their own failures and
/// never report them back to the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, text: &str);
}

/// Writes alerts to the log instead of sending them anywhere.
/// Used when no messaging channel is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, text: &str) {
        info!(alert = %text, "Alert (log only)");
    }
}
