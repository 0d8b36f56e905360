//! Email delivery
//!
//! The `Mailer` trait hides the SMTP transport so the comment service
//! can be tested with a recording fake. `SmtpMailer` is the production
//! implementation built on lettre's async transport.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

/// An outgoing notification email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Email transport abstraction
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single message
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

/// SMTP mailer backed by lettre
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        if self.config.host.is_empty() {
            return Err(anyhow!(
                "SMTP host not configured. Please configure SMTP settings first."
            ));
        }

        let email = Message::builder()
            .from(message
                .from
                .parse()
                .map_err(|e| anyhow!("Invalid from address: {}", e))?)
            .to(message
                .to
                .parse()
                .map_err(|e| anyhow!("Invalid to address: {}", e))?)
            .subject(message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.html)
            .map_err(|e| anyhow!("Failed to build email: {}", e))?;

        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        let transport: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
                .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?
                .credentials(creds)
                .port(self.config.port)
                .build();

        transport
            .send(email)
            .await
            .map_err(|e| anyhow!("Failed to send email: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_host_fails() {
        let mailer = SmtpMailer::new(SmtpConfig::default());

        let result = mailer
            .send(EmailMessage {
                from: "a@example.com".to_string(),
                to: "b@example.com".to_string(),
                subject: "hi".to_string(),
                html: "<p>hi</p>".to_string(),
            })
            .await;

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("SMTP host not configured"));
    }
}
