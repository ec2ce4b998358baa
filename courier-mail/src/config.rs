//! Delivery configuration.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `APP_URL` | empty | Base URL used to build links |
//! | `APP_NAME` | `Evo AI` | Product name used in subjects |
//! | `EMAIL_PROVIDER` | `sendgrid` | `sendgrid` or `smtp` |
//! | `EMAIL_TEMPLATES_DIR` | `templates/emails` in this crate | Template root |
//! | `SENDGRID_API_KEY` | | SendGrid API key |
//! | `SENDGRID_API_URL` | production endpoint | SendGrid `mail/send` endpoint |
//! | `EMAIL_FROM` | | Sender for SendGrid |
//! | `SMTP_HOST` | | SMTP server hostname |
//! | `SMTP_PORT` | `587` | SMTP server port |
//! | `SMTP_USER` / `SMTP_PASSWORD` | | Credentials, used only when both are set |
//! | `SMTP_FROM` | | Sender for SMTP |
//! | `SMTP_USE_TLS` | `false` | Upgrade with STARTTLS |
//! | `SMTP_USE_SSL` | `false` | Implicit TLS, takes precedence over STARTTLS |
//! | `SMTP_TIMEOUT` | `30` | Connection timeout in seconds |

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::{EnvLoader, MailError, Result, SendGridConfig, SmtpConfig, SmtpSecurity};

/// Product name used in subjects when `APP_NAME` is unset.
pub const DEFAULT_APP_NAME: &str = "Evo AI";

/// Delivery backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailProvider {
    /// SendGrid HTTP API.
    #[default]
    SendGrid,
    /// Direct SMTP submission.
    Smtp,
}

impl EmailProvider {
    /// Resolve the `EMAIL_PROVIDER` setting.
    ///
    /// Only `smtp` (any case) selects SMTP. Anything else, including an unset
    /// value, selects SendGrid; unknown values are logged.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("smtp") => Self::Smtp,
            None | Some("sendgrid") => Self::SendGrid,
            Some(other) => {
                warn!(
                    provider = other,
                    "Unrecognized EMAIL_PROVIDER, falling back to sendgrid"
                );
                Self::SendGrid
            }
        }
    }

    /// Provider name as used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SendGrid => "sendgrid",
            Self::Smtp => "smtp",
        }
    }
}

/// Immutable configuration for the notifier and its dispatcher.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Base application URL, links are built by appending fixed paths.
    pub app_url: String,
    /// Product name used in subjects.
    pub app_name: String,
    /// Selected backend.
    pub provider: EmailProvider,
    /// Directory holding `<name>.html` templates.
    pub template_dir: PathBuf,
    /// SendGrid settings.
    pub sendgrid: SendGridConfig,
    /// SMTP settings.
    pub smtp: SmtpConfig,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            app_url: String::new(),
            app_name: DEFAULT_APP_NAME.to_string(),
            provider: EmailProvider::default(),
            template_dir: default_template_dir(),
            sendgrid: SendGridConfig::default(),
            smtp: SmtpConfig::default(),
        }
    }
}

impl MailConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let loader = EnvLoader::default();
        Self::from_lookup(|key| loader.get(key))
    }

    /// Load a `.env` file if one exists, then read the process environment.
    pub fn from_dotenv() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Malformed numbers are rejected;
    /// missing hosts, keys and senders are reported when a send is attempted.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut smtp = SmtpConfig::default();
        smtp.host = get("SMTP_HOST");
        if let Some(port) = get("SMTP_PORT") {
            smtp.port = port
                .trim()
                .parse()
                .map_err(|_| MailError::Config(format!("Invalid SMTP_PORT: {}", port)))?;
        }
        if let Some(timeout) = get("SMTP_TIMEOUT") {
            let secs: u64 = timeout
                .trim()
                .parse()
                .map_err(|_| MailError::Config(format!("Invalid SMTP_TIMEOUT: {}", timeout)))?;
            smtp.timeout = Duration::from_secs(secs);
        }
        smtp.username = get("SMTP_USER");
        smtp.password = get("SMTP_PASSWORD");
        smtp.from = get("SMTP_FROM");
        smtp.security = if flag(get("SMTP_USE_SSL")) {
            SmtpSecurity::Tls
        } else if flag(get("SMTP_USE_TLS")) {
            SmtpSecurity::StartTls
        } else {
            SmtpSecurity::None
        };

        let mut sendgrid = SendGridConfig::default();
        sendgrid.api_key = get("SENDGRID_API_KEY");
        sendgrid.from = get("EMAIL_FROM");
        if let Some(endpoint) = get("SENDGRID_API_URL") {
            sendgrid.endpoint = endpoint;
        }

        Ok(Self {
            app_url: get("APP_URL").unwrap_or_default(),
            app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            provider: EmailProvider::from_setting(get("EMAIL_PROVIDER").as_deref()),
            template_dir: get("EMAIL_TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_template_dir),
            sendgrid,
            smtp,
        })
    }

    /// Sender address for the selected provider.
    pub fn sender(&self) -> Option<&str> {
        match self.provider {
            EmailProvider::SendGrid => self.sendgrid.from.as_deref(),
            EmailProvider::Smtp => self.smtp.from.as_deref(),
        }
    }
}

/// Templates bundled with this crate.
pub fn default_template_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("templates")
        .join("emails")
}

fn flag(value: Option<String>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
