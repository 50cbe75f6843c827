use std::time::Duration;

use async_trait::async_trait;
use teloxide::{
    payloads::SendMessageSetters,
    requests::{Request, Requester},
    types::{ChatId, ParseMode},
    Bot,
};
use tracing::{info, warn};

use common::{Notifier, TelegramConfig};

/// Delivers alerts to a single Telegram chat.
///
/// Sends are bounded by `timeout` and never report failure to the caller;
/// a lost alert is logged and dropped.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(cfg: &TelegramConfig, timeout: Duration) -> Self {
        info!(chat_id = cfg.chat_id, "Telegram notifier ready");
        Self {
            bot: Bot::new(cfg.bot_token.clone()),
            chat_id: ChatId(cfg.chat_id),
            timeout,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(&self, text: &str) {
        #[allow(deprecated)] // alert templates are written for legacy Markdown
        let request = self
            .bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Markdown);

        match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(Ok(_)) => info!(chat_id = ?self.chat_id, "Alert delivered"),
            Ok(Err(e)) => {
                warn!(chat_id = ?self.chat_id, error = %e, "Failed to send Telegram alert")
            }
            Err(_) => warn!(
                chat_id = ?self.chat_id,
                timeout = ?self.timeout,
                "Telegram alert timed out"
            ),
        }
    }
}
