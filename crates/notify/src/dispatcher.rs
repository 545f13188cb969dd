use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use common::{Config, NotificationEvent, Signal};

use crate::{render, EmailChannel, NotificationChannel, TelegramChannel};

/// Per-dispatch outcome, collected from every channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub delivered: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

impl DispatchSummary {
    pub fn any_delivered(&self) -> bool {
        !self.delivered.is_empty()
    }
}

enum Outcome {
    Delivered,
    Failed,
    Skipped,
}

/// Fans a transition event out to every registered channel.
///
/// Never fails: unconfigured channels are skipped, transport errors are
/// logged and counted, and the remaining channels are still attempted.
pub struct NotificationDispatcher {
    asset: String,
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl NotificationDispatcher {
    pub fn new(asset: impl Into<String>, channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self {
            asset: asset.into(),
            channels,
        }
    }

    /// E-mail and Telegram channels built from configuration.
    pub fn from_config(cfg: &Config) -> Self {
        let channels: Vec<Arc<dyn NotificationChannel>> = vec![
            Arc::new(EmailChannel::new(cfg.email.clone())),
            Arc::new(TelegramChannel::new(&cfg.telegram)),
        ];
        Self::new(display_name(&cfg.coin_id), channels)
    }

    pub async fn dispatch(&self, event: &NotificationEvent) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        if event.signal == Signal::Hold {
            debug!("Hold signal, nothing to notify");
            return summary;
        }
        let Some(message) = render(event, &self.asset) else {
            return summary;
        };

        let attempts = self.channels.iter().map(|channel| {
            let message = &message;
            async move {
                let name = channel.name().to_string();
                if !channel.is_configured() {
                    info!(channel = %name, "Channel not configured, skipping notification");
                    return (name, Outcome::Skipped);
                }
                match channel.send(message).await {
                    Ok(()) => {
                        info!(channel = %name, signal = %event.signal, "Notification delivered");
                        (name, Outcome::Delivered)
                    }
                    Err(e) => {
                        warn!(channel = %name, error = %e, "Notification failed");
                        (name, Outcome::Failed)
                    }
                }
            }
        });

        for (name, outcome) in join_all(attempts).await {
            match outcome {
                Outcome::Delivered => summary.delivered.push(name),
                Outcome::Failed => summary.failed.push(name),
                Outcome::Skipped => summary.skipped.push(name),
            }
        }

        if summary.any_delivered() {
            info!(
                delivered = summary.delivered.len(),
                failed = summary.failed.len(),
                skipped = summary.skipped.len(),
                "Notification dispatch complete"
            );
        } else {
            warn!(
                failed = ?summary.failed,
                skipped = ?summary.skipped,
                "All notification channels failed or are not configured"
            );
        }
        summary
    }
}

/// "solana" -> "Solana", "avalanche-2" -> "Avalanche-2".
fn display_name(coin_id: &str) -> String {
    let mut chars = coin_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
