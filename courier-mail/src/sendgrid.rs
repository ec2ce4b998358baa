//! SendGrid email provider integration.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::{Email, MailError, Result, Transport};

/// Production `mail/send` endpoint.
pub const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// SendGrid configuration.
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// API key.
    pub api_key: Option<String>,
    /// Sender address.
    pub from: Option<String>,
    /// API endpoint (defaults to production).
    pub endpoint: String,
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from: None,
            endpoint: SENDGRID_ENDPOINT.to_string(),
        }
    }
}

impl SendGridConfig {
    /// Create a new SendGrid configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Set the sender address.
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set a custom endpoint (for testing).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// SendGrid transport.
pub struct SendGridTransport {
    client: Client,
    config: SendGridConfig,
}

impl SendGridTransport {
    /// Create a new SendGrid transport.
    pub fn new(config: SendGridConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Transport for SendGridTransport {
    fn name(&self) -> &'static str {
        "sendgrid"
    }

    async fn send(&self, email: &Email) -> Result<()> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| MailError::Config("SENDGRID_API_KEY is not set".to_string()))?;

        let payload = SendGridPayload::from_email(email);

        debug!(
            endpoint = %self.config.endpoint,
            subject = %email.subject,
            "Sending email via SendGrid"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            debug!(status = status.as_u16(), "SendGrid accepted the message");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MailError::Provider {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// SendGrid v3 API payload.
#[derive(Debug, Serialize)]
struct SendGridPayload {
    personalizations: Vec<Personalization>,
    from: EmailAddress,
    subject: String,
    content: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<EmailAddress>,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

impl From<&crate::Address> for EmailAddress {
    fn from(address: &crate::Address) -> Self {
        Self {
            email: address.email.clone(),
            name: address.name.clone(),
        }
    }
}

impl SendGridPayload {
    fn from_email(email: &Email) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![EmailAddress::from(&email.to)],
            }],
            from: EmailAddress::from(&email.from),
            subject: email.subject.clone(),
            content: vec![Content {
                content_type: "text/html".to_string(),
                value: email.html.clone(),
            }],
        }
    }
}
