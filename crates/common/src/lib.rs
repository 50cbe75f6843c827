pub mod config;
pub mod error;
pub mod notify;
pub mod provider;
pub mod types;

pub use config::{Config, TelegramConfig};
pub use error::{Error, Result};
pub use notify::{LogNotifier, Notifier};
pub use provider::DataProvider;
pub use types::*;
