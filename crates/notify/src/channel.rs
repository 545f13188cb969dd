use async_trait::async_trait;

use common::Result;

use crate::RenderedMessage;

/// One outbound notification transport (Telegram, e-mail, ...).
///
/// Implementations report failures as `Error::ChannelUnavailable`; the
/// dispatcher absorbs them so one broken channel never affects another.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Short identifier used in logs, e.g. "telegram".
    fn name(&self) -> &str;

    /// False when required credentials or endpoints are missing.
    /// Unconfigured channels are skipped, not counted as failures.
    fn is_configured(&self) -> bool;

    async fn send(&self, message: &RenderedMessage) -> Result<()>;
}
