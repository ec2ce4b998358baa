//! Delivery through the configured backend.

use std::sync::Arc;
use tracing::{error, info};

use crate::{
    Email, EmailProvider, MailConfig, MailError, Result, SendGridTransport, SmtpTransport,
    Transport,
};

/// Sends rendered messages through one transport and reports a boolean.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    from: Option<String>,
}

impl Dispatcher {
    /// Create a dispatcher over any transport.
    pub fn new(transport: Arc<dyn Transport>, from: Option<String>) -> Self {
        Self { transport, from }
    }

    /// Select the transport and sender named by the configuration.
    pub fn from_config(config: &MailConfig) -> Self {
        let transport: Arc<dyn Transport> = match config.provider {
            EmailProvider::Smtp => Arc::new(SmtpTransport::new(config.smtp.clone())),
            EmailProvider::SendGrid => Arc::new(SendGridTransport::new(config.sendgrid.clone())),
        };
        Self::new(transport, config.sender().map(str::to_string))
    }

    /// Name of the active transport.
    pub fn provider(&self) -> &'static str {
        self.transport.name()
    }

    /// Send an HTML email, logging the outcome.
    ///
    /// Every failure is logged once with the recipient and reduced to `false`.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> bool {
        let provider = self.transport.name();

        match self.try_send(to, subject, html).await {
            Ok(()) => {
                info!(to, provider, "Email sent");
                true
            }
            Err(e @ MailError::Provider { .. }) => {
                error!(
                    to,
                    provider,
                    status = e.status(),
                    error = %e,
                    "Failed to send email"
                );
                false
            }
            Err(e) => {
                error!(to, provider, error = %e, "Error sending email");
                false
            }
        }
    }

    async fn try_send(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        let from = self.from.as_deref().ok_or_else(|| {
            MailError::Config(format!("No sender address configured for {}", self.provider()))
        })?;

        let email = Email::new(from, to, subject, html)?;
        self.transport.send(&email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<Email>>,
        fail: bool,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, email: &Email) -> Result<()> {
            if self.fail {
                return Err(MailError::Network("connection reset".to_string()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_send_builds_email() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = Dispatcher::new(transport.clone(), Some("team@example.com".to_string()));

        assert!(dispatcher.send("jane@example.com", "Hello", "<p>Hi</p>").await);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from.email(), "team@example.com");
        assert_eq!(sent[0].to.email(), "jane@example.com");
        assert_eq!(sent[0].subject, "Hello");
        assert_eq!(sent[0].html, "<p>Hi</p>");
    }

    #[tokio::test]
    async fn test_transport_failure_is_false() {
        let transport = Arc::new(RecordingTransport {
            fail: true,
            ..Default::default()
        });
        let dispatcher = Dispatcher::new(transport, Some("team@example.com".to_string()));

        assert!(!dispatcher.send("jane@example.com", "Hello", "<p>Hi</p>").await);
    }

    #[tokio::test]
    async fn test_missing_sender_is_false() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = Dispatcher::new(transport.clone(), None);

        assert!(!dispatcher.send("jane@example.com", "Hello", "<p>Hi</p>").await);
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_false() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = Dispatcher::new(transport.clone(), Some("team@example.com".to_string()));

        assert!(!dispatcher.send("not an address", "Hello", "<p>Hi</p>").await);
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_domain_addresses_are_sent() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = Dispatcher::new(transport.clone(), Some("noreply@localhost".to_string()));

        assert!(dispatcher.send("admin@example.com", "Hello", "<p>Hi</p>").await);
        assert!(dispatcher.send("root@localhost", "Hello", "<p>Hi</p>").await);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].from.email(), "noreply@localhost");
        assert_eq!(sent[1].to.email(), "root@localhost");
    }

    #[test]
    fn test_from_config_selects_provider() {
        let mut config = MailConfig::default();
        assert_eq!(Dispatcher::from_config(&config).provider(), "sendgrid");

        config.provider = EmailProvider::Smtp;
        assert_eq!(Dispatcher::from_config(&config).provider(), "smtp");
    }
}
