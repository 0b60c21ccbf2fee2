//! `Notifier` implementations.

pub mod email;

use maintflow_core::notify::Notifier;
use maintflow_types::error::NotifyError;

use self::email::{EmailConfig, EmailDelivery};

/// Outbound mail: SMTP when configured, otherwise a log line per message.
pub enum MailNotifier {
    Smtp(EmailDelivery),
    Log,
}

impl MailNotifier {
    /// SMTP if `SMTP_HOST` is set, log-only otherwise.
    pub fn from_env() -> Self {
        match EmailConfig::from_env() {
            Some(config) => {
                tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP notifications enabled");
                MailNotifier::Smtp(EmailDelivery::new(config))
            }
            None => {
                tracing::info!("SMTP_HOST not set, notifications will be logged only");
                MailNotifier::Log
            }
        }
    }
}

impl Notifier for MailNotifier {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        match self {
            MailNotifier::Smtp(delivery) => delivery.send(to, subject, body).await,
            MailNotifier::Log => {
                tracing::warn!(to, subject, body, "email not sent (SMTP not configured)");
                Ok(())
            }
        }
    }
}
