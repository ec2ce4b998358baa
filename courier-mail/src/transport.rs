//! Email transport implementations.

use async_trait::async_trait;
use lettre::{
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use std::time::Duration;
use tracing::debug;

use crate::{Email, MailError, Result};

/// Email transport trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Send an email.
    async fn send(&self, email: &Email) -> Result<()>;
}

/// SMTP security mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// Plaintext connection.
    #[default]
    None,
    /// Plaintext connection upgraded with STARTTLS.
    StartTls,
    /// Implicit TLS from the first byte.
    Tls,
}

/// SMTP configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server host.
    pub host: Option<String>,
    /// SMTP server port.
    pub port: u16,
    /// Security mode.
    pub security: SmtpSecurity,
    /// Username for authentication.
    pub username: Option<String>,
    /// Password for authentication.
    pub password: Option<String>,
    /// Sender address.
    pub from: Option<String>,
    /// Connection timeout.
    pub timeout: Duration,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 587,
            security: SmtpSecurity::None,
            username: None,
            password: None,
            from: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SmtpConfig {
    /// Create a new SMTP configuration.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Self::default()
        }
    }

    /// Set credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Upgrade the connection with STARTTLS.
    pub fn starttls(mut self) -> Self {
        self.security = SmtpSecurity::StartTls;
        self
    }

    /// Use implicit TLS.
    pub fn tls(mut self) -> Self {
        self.security = SmtpSecurity::Tls;
        self
    }

    /// Set the sender address.
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the connection timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Credentials, when both username and password are set.
    fn auth(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                Some(Credentials::new(username.clone(), password.clone()))
            }
            _ => None,
        }
    }
}

/// SMTP transport.
///
/// Every send opens its own connection and closes it afterwards.
pub struct SmtpTransport {
    config: SmtpConfig,
}

impl SmtpTransport {
    /// Create a new SMTP transport.
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    fn build(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let host = self
            .config
            .host
            .as_deref()
            .ok_or_else(|| MailError::Config("SMTP_HOST is not set".to_string()))?;

        let mut builder = match self.config.security {
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)?,
        };

        builder = builder
            .port(self.config.port)
            .timeout(Some(self.config.timeout));

        if let Some(credentials) = self.config.auth() {
            builder = builder.credentials(credentials);
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, email: &Email) -> Result<()> {
        let message = email.to_lettre()?;
        let transport = self.build()?;

        debug!(
            host = ?self.config.host,
            port = self.config.port,
            security = ?self.config.security,
            subject = %email.subject,
            "Sending email via SMTP"
        );

        transport.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email::new(
            "sender@example.com",
            "recipient@example.com",
            "Test",
            "<p>Hello</p>",
        )
        .unwrap()
    }

    #[test]
    fn test_smtp_config_builder() {
        let config = SmtpConfig::new("smtp.example.com")
            .port(2525)
            .starttls()
            .credentials("user", "pass")
            .from("no-reply@example.com");

        assert_eq!(config.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(config.port, 2525);
        assert_eq!(config.security, SmtpSecurity::StartTls);
        assert_eq!(config.username.as_deref(), Some("user"));
        assert_eq!(config.from.as_deref(), Some("no-reply@example.com"));
        assert!(config.auth().is_some());
    }

    #[test]
    fn test_auth_requires_both_credentials() {
        let mut config = SmtpConfig::new("smtp.example.com");
        config.username = Some("user".to_string());
        assert!(config.auth().is_none());
    }

    #[tokio::test]
    async fn test_missing_host_is_config_error() {
        let transport = SmtpTransport::new(SmtpConfig::default());
        let result = transport.send(&email()).await;
        assert!(matches!(result, Err(MailError::Config(_))));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = SmtpTransport::new(
            SmtpConfig::new("127.0.0.1")
                .port(port)
                .timeout(Duration::from_secs(2)),
        );
        let result = transport.send(&email()).await;
        assert!(matches!(result, Err(MailError::Smtp(_))));
    }
}
