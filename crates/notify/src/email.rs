use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use common::{EmailSettings, Error, Result};

use crate::{NotificationChannel, RenderedMessage};

/// Sends signal alerts as HTML e-mail over SMTP with STARTTLS.
pub struct EmailChannel {
    settings: EmailSettings,
}

impl EmailChannel {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    fn build_message(&self, message: &RenderedMessage) -> Result<Message> {
        let user = self.settings.user.as_deref().unwrap_or_default();
        let to = self.settings.to.as_deref().unwrap_or(user);

        let from = user
            .parse()
            .map_err(|e| Error::channel(self.name(), format!("invalid sender '{user}': {e}")))?;
        let to = to
            .parse()
            .map_err(|e| Error::channel(self.name(), format!("invalid recipient '{to}': {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|e| Error::channel(self.name(), e))
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    fn is_configured(&self) -> bool {
        self.settings.host.is_some()
            && self.settings.user.is_some()
            && self.settings.password.is_some()
    }

    async fn send(&self, message: &RenderedMessage) -> Result<()> {
        let (Some(host), Some(user), Some(password)) = (
            &self.settings.host,
            &self.settings.user,
            &self.settings.password,
        ) else {
            return Err(Error::channel(self.name(), "SMTP host or credentials not set"));
        };

        let email = self.build_message(message)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| Error::channel(self.name(), e))?
            .port(self.settings.port)
            .credentials(Credentials::new(user.clone(), password.clone()))
            .build();

        transport
            .send(email)
            .await
            .map_err(|e| Error::channel(self.name(), e))?;

        debug!(host = %host, "E-mail alert sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EmailSettings {
        EmailSettings {
            host: Some("smtp.example.com".into()),
            port: 587,
            user: Some("bot@example.com".into()),
            password: Some("hunter2".into()),
            to: None,
        }
    }

    fn rendered() -> RenderedMessage {
        RenderedMessage {
            subject: "Solana BUY signal".into(),
            text: String::new(),
            html: "<h2>Solana BUY signal</h2>".into(),
        }
    }

    #[test]
    fn configured_only_with_host_and_credentials() {
        assert!(EmailChannel::new(settings()).is_configured());

        let mut missing_pass = settings();
        missing_pass.password = None;
        assert!(!EmailChannel::new(missing_pass).is_configured());
    }

    #[test]
    fn recipient_defaults_to_sender() {
        let channel = EmailChannel::new(settings());
        let email = channel.build_message(&rendered()).unwrap();
        let headers = String::from_utf8(email.formatted()).unwrap();
        assert!(headers.contains("To: bot@example.com"));
        assert!(headers.contains("Subject: Solana BUY signal"));
    }

    #[test]
    fn invalid_sender_is_channel_error() {
        let mut bad = settings();
        bad.user = Some("not an address".into());
        let err = EmailChannel::new(bad).build_message(&rendered()).unwrap_err();
        assert!(matches!(err, Error::ChannelUnavailable { .. }));
    }
}
