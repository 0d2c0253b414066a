/// Outbound email: the delivery collaborator of the recovery flow
use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::EmailSettings;
use crate::error::{AppError, Result};

/// Delivery side of credential recovery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the password-recovery email carrying `token` to `recipient`.
    async fn send_password_reset(&self, recipient: &str, token: &str) -> Result<()>;
}

/// SMTP-backed mailer.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    reset_base_url: String,
    token_ttl_hours: i64,
}

impl SmtpMailer {
    /// Build the mailer from configuration.
    ///
    /// If the SMTP host is empty the mailer operates in no-op mode (logs
    /// only), which keeps development setups working without mail
    /// infrastructure.
    pub fn new(
        config: &EmailSettings,
        reset_base_url: String,
        token_ttl_hours: i64,
    ) -> Result<Self> {
        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid SMTP_FROM address: {}", e)))?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; mailer will operate in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            }
            .map_err(|e| {
                AppError::Internal(format!("Failed to configure SMTP transport: {}", e))
            })?
            .port(config.smtp_port);

            let builder = if let (Some(username), Some(password)) =
                (&config.smtp_username, &config.smtp_password)
            {
                builder.credentials(Credentials::new(username.to_string(), password.to_string()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            reset_base_url,
            token_ttl_hours,
        })
    }

    fn build_reset_link(&self, token: &str) -> String {
        format!("{}?token={}", self.reset_base_url, token)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, recipient: &str, token: &str) -> Result<()> {
        let link = self.build_reset_link(token);
        let subject = "Password recovery";
        let body = format!(
            "We received your password reset request.\n\n\
             Please open the following link to choose a new password:\n{}\n\n\
             This link expires in {} hour(s).\n\
             If you did not request this, please ignore this email.",
            link, self.token_ttl_hours
        );

        let Some(transport) = &self.transport else {
            info!(recipient, "mailer running in no-op mode; skipping actual send");
            return Ok(());
        };

        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| AppError::Email(format!("Invalid recipient email address: {}", e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body)?;

        transport.send(email).await?;
        info!(subject, "password recovery email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_settings() -> EmailSettings {
        EmailSettings {
            smtp_host: String::new(),
            smtp_port: 1025,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "noreply@example.com".to_string(),
            use_starttls: false,
        }
    }

    #[test]
    fn test_reset_link_embeds_token() {
        let mailer = SmtpMailer::new(
            &noop_settings(),
            "https://app.example.com/reset-password".to_string(),
            1,
        )
        .unwrap();

        assert_eq!(
            mailer.build_reset_link("abc123"),
            "https://app.example.com/reset-password?token=abc123"
        );
    }

    #[tokio::test]
    async fn test_noop_mode_send_succeeds() {
        let mailer = SmtpMailer::new(
            &noop_settings(),
            "https://app.example.com/reset-password".to_string(),
            1,
        )
        .unwrap();

        assert!(mailer
            .send_password_reset("user@example.com", "abc123")
            .await
            .is_ok());
    }

    #[test]
    fn test_invalid_from_address_is_rejected() {
        let mut settings = noop_settings();
        settings.smtp_from = "not an address".to_string();

        assert!(SmtpMailer::new(
            &settings,
            "https://app.example.com/reset-password".to_string(),
            1
        )
        .is_err());
    }
}
