//! Email message types.

use lettre::message::{MultiPart, SinglePart};
use serde::{Deserialize, Serialize};

use crate::{Address, IntoAddress, MailError, Result};

/// A rendered, single-recipient HTML email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Sender address.
    pub from: Address,
    /// Recipient address.
    pub to: Address,
    /// Email subject.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

impl Email {
    /// Create a new HTML email.
    pub fn new(
        from: impl IntoAddress,
        to: impl IntoAddress,
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            from: from.into_address()?,
            to: to.into_address()?,
            subject: subject.into(),
            html: html.into(),
        })
    }

    /// Build a MIME `multipart/mixed` message holding the HTML part.
    pub(crate) fn to_lettre(&self) -> Result<lettre::Message> {
        let body = MultiPart::mixed().singlepart(SinglePart::html(self.html.clone()));

        lettre::Message::builder()
            .from(self.from.to_mailbox()?)
            .to(self.to.to_mailbox()?)
            .subject(self.subject.as_str())
            .multipart(body)
            .map_err(|e| MailError::Smtp(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_new() {
        let email = Email::new(
            "sender@example.com",
            "recipient@example.com",
            "Test",
            "<p>Hello</p>",
        )
        .unwrap();

        assert_eq!(email.from.email(), "sender@example.com");
        assert_eq!(email.to.email(), "recipient@example.com");
        assert_eq!(email.subject, "Test");
    }

    #[test]
    fn test_email_invalid_recipient() {
        let result = Email::new("sender@example.com", "not-an-address", "Test", "<p></p>");
        assert!(matches!(result, Err(MailError::InvalidAddress(_))));
    }

    #[test]
    fn test_to_lettre_is_multipart_html() {
        let email = Email::new(
            "Evo AI <sender@example.com>",
            "recipient@example.com",
            "Welcome",
            "<h1>Hi</h1>",
        )
        .unwrap();

        let message = email.to_lettre().unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Subject: Welcome"));
        assert!(formatted.contains("To: recipient@example.com"));
        assert!(formatted.contains("multipart/mixed"));
        assert!(formatted.contains("text/html"));
        assert!(formatted.contains("<h1>Hi</h1>"));
    }
}
