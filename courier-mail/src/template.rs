//! Template rendering with a fallback body.

use std::path::Path;
use std::sync::Arc;
use tracing::error;

use crate::{Context, HandlebarsEngine, MailError, Result};

/// Template engine trait for rendering email templates.
pub trait TemplateEngine: Send + Sync {
    /// Render a template with the given name and context.
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String>;

    /// Check if a template exists.
    fn has_template(&self, name: &str) -> bool;

    /// Register a template from a string.
    fn register_template(&mut self, name: &str, content: &str) -> Result<()>;
}

/// Outcome of rendering a template.
#[derive(Debug)]
pub enum Rendering {
    /// The template rendered.
    Rendered(String),
    /// The template failed; `html` is the fallback body.
    Fallback {
        /// Minimal body carrying the actionable link.
        html: String,
        /// Why the template failed.
        error: MailError,
    },
}

impl Rendering {
    /// The HTML body, rendered or fallback.
    pub fn html(&self) -> &str {
        match self {
            Self::Rendered(html) | Self::Fallback { html, .. } => html,
        }
    }

    /// Take the HTML body.
    pub fn into_html(self) -> String {
        match self {
            Self::Rendered(html) | Self::Fallback { html, .. } => html,
        }
    }

    /// Whether the fallback body was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// The render error, if the fallback was used.
    pub fn error(&self) -> Option<&MailError> {
        match self {
            Self::Rendered(_) => None,
            Self::Fallback { error, .. } => Some(error),
        }
    }
}

/// Fallback body: a notice with the verification or reset link, if any.
pub fn fallback_html(context: &Context) -> String {
    let link = ["verification_link", "reset_link"]
        .iter()
        .find_map(|key| context.get_str(key).filter(|link| !link.is_empty()))
        .unwrap_or_default();

    format!(
        "<p>Could not display email content. Please access {}</p>",
        handlebars::html_escape(link)
    )
}

/// Renders named templates, never failing.
#[derive(Clone)]
pub struct TemplateRenderer {
    engine: Arc<dyn TemplateEngine>,
}

impl TemplateRenderer {
    /// Create a renderer over any engine.
    pub fn new(engine: impl TemplateEngine + 'static) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Render `<dir>/<name>.html` templates with Handlebars.
    pub fn from_directory(dir: impl AsRef<Path>) -> Self {
        Self::new(HandlebarsEngine::from_directory(dir))
    }

    /// Render `name`, logging and falling back on any failure.
    pub fn render(&self, name: &str, context: &Context) -> Rendering {
        match self.engine.render(name, &context.to_value()) {
            Ok(html) => Rendering::Rendered(html),
            Err(error) => {
                error!(template = name, error = %error, "Error rendering template");
                Rendering::Fallback {
                    html: fallback_html(context),
                    error,
                }
            }
        }
    }
}
