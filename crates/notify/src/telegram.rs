use async_trait::async_trait;
use teloxide::{payloads::SendMessageSetters, prelude::*, types::ParseMode, types::Recipient};
use tracing::debug;

use common::{Error, Result, TelegramSettings};

use crate::{NotificationChannel, RenderedMessage};

/// Sends signal alerts to one Telegram chat through the Bot API.
pub struct TelegramChannel {
    bot: Option<Bot>,
    chat: Option<Recipient>,
}

impl TelegramChannel {
    pub fn new(settings: &TelegramSettings) -> Self {
        Self {
            bot: settings.bot_token.as_ref().map(Bot::new),
            chat: settings.chat_id.as_deref().map(parse_recipient),
        }
    }
}

/// Numeric ids address users and groups; anything else is a `@channel` username.
fn parse_recipient(raw: &str) -> Recipient {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if raw.starts_with('@') => Recipient::ChannelUsername(raw.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{raw}")),
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn is_configured(&self) -> bool {
        self.bot.is_some() && self.chat.is_some()
    }

    async fn send(&self, message: &RenderedMessage) -> Result<()> {
        let (Some(bot), Some(chat)) = (&self.bot, &self.chat) else {
            return Err(Error::channel(self.name(), "bot token or chat id not set"));
        };

        bot.send_message(chat.clone(), message.text.clone())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| Error::channel(self.name(), e))?;

        debug!(chat = ?chat, "Telegram alert sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_chat_id_is_an_id() {
        assert_eq!(parse_recipient("-100123"), Recipient::Id(ChatId(-100123)));
    }

    #[test]
    fn username_gets_at_prefix() {
        assert_eq!(
            parse_recipient("solsignals"),
            Recipient::ChannelUsername("@solsignals".into())
        );
        assert_eq!(
            parse_recipient("@solsignals"),
            Recipient::ChannelUsername("@solsignals".into())
        );
    }

    #[test]
    fn missing_settings_leave_channel_unconfigured() {
        let channel = TelegramChannel::new(&TelegramSettings {
            bot_token: Some("123:abc".into()),
            chat_id: None,
        });
        assert!(!channel.is_configured());
    }
}
