//! # Courier Mail
//!
//! Transactional account emails rendered from HTML templates and delivered
//! through SendGrid or SMTP.
//!
//! ## Features
//!
//! - **Notifications**: verification, password reset, welcome and
//!   account-locked emails
//! - **Templates**: Handlebars with HTML auto-escaping and a fallback body that
//!   still carries the actionable link
//! - **Transports**: SendGrid HTTP API or direct SMTP (plaintext, STARTTLS or
//!   implicit TLS)
//! - **Boolean outcomes**: every failure is logged and reported as `false`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier_mail::{MailConfig, Notifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // EMAIL_PROVIDER, SENDGRID_API_KEY, SMTP_HOST, APP_URL, ...
//!     let notifier = Notifier::new(MailConfig::from_env()?);
//!
//!     let sent = notifier
//!         .send_verification_email("jane.doe@example.com", "token-123")
//!         .await;
//!     println!("verification sent: {}", sent);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Transport
//!
//! ```rust,ignore
//! use courier_mail::{Email, MailConfig, Notifier, Result, Transport};
//!
//! struct Outbox;
//!
//! #[async_trait::async_trait]
//! impl Transport for Outbox {
//!     fn name(&self) -> &'static str { "outbox" }
//!     async fn send(&self, email: &Email) -> Result<()> {
//!         println!("{} -> {}", email.subject, email.to);
//!         Ok(())
//!     }
//! }
//!
//! let notifier = Notifier::new(MailConfig::from_env()?).with_transport(Outbox);
//! ```

mod address;
mod config;
mod context;
mod dispatcher;
mod email;
mod env;
mod error;
mod notifier;
mod sendgrid;
mod template;
mod template_handlebars;
mod transport;

pub use address::{Address, IntoAddress};
pub use config::{default_template_dir, EmailProvider, MailConfig, DEFAULT_APP_NAME};
pub use context::Context;
pub use dispatcher::Dispatcher;
pub use email::Email;
pub use env::EnvLoader;
pub use error::{MailError, Result};
pub use notifier::{
    dashboard_link, reset_link, user_name_from_email, verification_link, NotificationKind,
    Notifier,
};
pub use sendgrid::{SendGridConfig, SendGridTransport, SENDGRID_ENDPOINT};
pub use template::{fallback_html, Rendering, TemplateEngine, TemplateRenderer};
pub use template_handlebars::{HandlebarsEngine, TEMPLATE_EXTENSION};
pub use transport::{SmtpConfig, SmtpSecurity, SmtpTransport, Transport};

/// Prelude for common imports.
///
/// ```
/// use courier_mail::prelude::*;
/// ```
pub mod prelude {
    pub use crate::address::{Address, IntoAddress};
    pub use crate::config::{EmailProvider, MailConfig};
    pub use crate::context::Context;
    pub use crate::dispatcher::Dispatcher;
    pub use crate::email::Email;
    pub use crate::error::{MailError, Result};
    pub use crate::notifier::{NotificationKind, Notifier};
    pub use crate::sendgrid::{SendGridConfig, SendGridTransport};
    pub use crate::template::{Rendering, TemplateEngine, TemplateRenderer};
    pub use crate::template_handlebars::HandlebarsEngine;
    pub use crate::transport::{SmtpConfig, SmtpSecurity, SmtpTransport, Transport};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_templates_render() {
        let renderer = TemplateRenderer::from_directory(default_template_dir());
        let context = Context::new()
            .with("user_name", "<b>jane</b>")
            .with("verification_link", "https://app.example.com/security/verify-email?code=t")
            .with("reset_link", "https://app.example.com/security/reset-password?token=t")
            .with("dashboard_link", "https://app.example.com/dashboard")
            .with("failed_attempts", 5)
            .with("time_period", "15 minutes")
            .with("current_year", 2026);

        for kind in [
            NotificationKind::Verification,
            NotificationKind::PasswordReset,
            NotificationKind::Welcome,
            NotificationKind::AccountLocked,
        ] {
            let rendering = renderer.render(kind.template(), &context);
            assert!(
                !rendering.is_fallback(),
                "{} failed: {:?}",
                kind.template(),
                rendering.error()
            );
            assert!(rendering.html().contains("&lt;b&gt;jane&lt;/b&gt;"));
            assert!(rendering.html().contains("2026"));
        }
    }
}
