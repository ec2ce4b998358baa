//! Account notification emails.

use chrono::{Datelike, Local};
use std::sync::Arc;
use tracing::error;

use crate::{
    Address, Context, Dispatcher, MailConfig, Result, TemplateEngine, TemplateRenderer, Transport,
};

/// The notifications this crate knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Email address verification.
    Verification,
    /// Password reset request.
    PasswordReset,
    /// Welcome after verification.
    Welcome,
    /// Account locked after repeated failed logins.
    AccountLocked,
}

impl NotificationKind {
    /// Template rendered for this notification.
    pub fn template(&self) -> &'static str {
        match self {
            Self::Verification => "verification_email",
            Self::PasswordReset => "password_reset",
            Self::Welcome => "welcome_email",
            Self::AccountLocked => "account_locked",
        }
    }

    /// Subject line, branded with `app_name` where applicable.
    pub fn subject(&self, app_name: &str) -> String {
        match self {
            Self::Verification => format!("Email Verification - {}", app_name),
            Self::PasswordReset => format!("Password Reset - {}", app_name),
            Self::Welcome => format!("Welcome to {}", app_name),
            Self::AccountLocked => "Security Alert - Account Locked".to_string(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::PasswordReset => "password reset",
            Self::Welcome => "welcome",
            Self::AccountLocked => "account locked",
        }
    }
}

/// `{app_url}/security/verify-email?code={token}`
pub fn verification_link(app_url: &str, token: &str) -> String {
    format!("{}/security/verify-email?code={}", app_url, token)
}

/// `{app_url}/security/reset-password?token={token}`
pub fn reset_link(app_url: &str, token: &str) -> String {
    format!("{}/security/reset-password?token={}", app_url, token)
}

/// `{app_url}/dashboard`
pub fn dashboard_link(app_url: &str) -> String {
    format!("{}/dashboard", app_url)
}

/// Everything before the first `@`.
pub fn user_name_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Renders and dispatches account notifications.
///
/// ```rust,ignore
/// use courier_mail::{MailConfig, Notifier};
///
/// let notifier = Notifier::new(MailConfig::from_env()?);
/// if !notifier.send_verification_email("jane@example.com", &token).await {
///     // tell the user to try again later
/// }
/// ```
#[derive(Clone)]
pub struct Notifier {
    config: Arc<MailConfig>,
    renderer: TemplateRenderer,
    dispatcher: Dispatcher,
}

impl Notifier {
    /// Build a notifier from configuration.
    pub fn new(config: MailConfig) -> Self {
        let renderer = TemplateRenderer::from_directory(&config.template_dir);
        let dispatcher = Dispatcher::from_config(&config);
        Self {
            config: Arc::new(config),
            renderer,
            dispatcher,
        }
    }

    /// Build a notifier from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(MailConfig::from_dotenv()?))
    }

    /// Replace the transport, keeping the configured sender.
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        let from = self.config.sender().map(str::to_string);
        self.dispatcher = Dispatcher::new(Arc::new(transport), from);
        self
    }

    /// Replace the template engine.
    pub fn with_template_engine(mut self, engine: impl TemplateEngine + 'static) -> Self {
        self.renderer = TemplateRenderer::new(engine);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    /// Send the email address verification link.
    pub async fn send_verification_email(&self, email: &str, token: &str) -> bool {
        let context = Context::new()
            .with(
                "verification_link",
                verification_link(&self.config.app_url, token),
            )
            .with("user_name", user_name_from_email(email));

        self.deliver(NotificationKind::Verification, email, context)
            .await
    }

    /// Send the password reset link.
    pub async fn send_password_reset_email(&self, email: &str, token: &str) -> bool {
        let context = Context::new()
            .with("reset_link", reset_link(&self.config.app_url, token))
            .with("user_name", user_name_from_email(email));

        self.deliver(NotificationKind::PasswordReset, email, context)
            .await
    }

    /// Send the welcome email; `user_name` defaults to the address' local part.
    pub async fn send_welcome_email(&self, email: &str, user_name: Option<&str>) -> bool {
        let user_name = user_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| user_name_from_email(email));

        let context = Context::new()
            .with("dashboard_link", dashboard_link(&self.config.app_url))
            .with("user_name", user_name);

        self.deliver(NotificationKind::Welcome, email, context).await
    }

    /// Warn that the account was locked and offer a reset link.
    pub async fn send_account_locked_email(
        &self,
        email: &str,
        reset_token: &str,
        failed_attempts: u32,
        time_period: &str,
    ) -> bool {
        let context = Context::new()
            .with("reset_link", reset_link(&self.config.app_url, reset_token))
            .with("user_name", user_name_from_email(email))
            .with("failed_attempts", failed_attempts)
            .with("time_period", time_period);

        self.deliver(NotificationKind::AccountLocked, email, context)
            .await
    }

    async fn deliver(&self, kind: NotificationKind, email: &str, context: Context) -> bool {
        if let Err(e) = Address::parse(email) {
            error!(
                to = email,
                notification = kind.label(),
                error = %e,
                "Error preparing email"
            );
            return false;
        }

        let context = context.with("current_year", Local::now().year());
        let rendering = self.renderer.render(kind.template(), &context);
        let subject = kind.subject(&self.config.app_name);

        self.dispatcher
            .send(email, &subject, rendering.html())
            .await
    }
}
