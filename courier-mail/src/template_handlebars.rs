//! Handlebars template engine integration.

use handlebars::Handlebars;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{MailError, Result, TemplateEngine};

/// Extension appended to template names when reading from disk.
pub const TEMPLATE_EXTENSION: &str = "html";

/// Handlebars-based template engine for emails.
///
/// Registered templates take precedence. Otherwise `<dir>/<name>.html` is read
/// from disk on every render, so edits show up without a restart. Values are
/// HTML-escaped and strict mode is on.
pub struct HandlebarsEngine {
    handlebars: Handlebars<'static>,
    template_dir: Option<PathBuf>,
}

impl HandlebarsEngine {
    /// Create a new Handlebars engine with no template directory.
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        Self {
            handlebars,
            template_dir: None,
        }
    }

    /// Create an engine that loads templates from `path`.
    ///
    /// The directory is not required to exist yet; a missing file surfaces as
    /// [`MailError::TemplateNotFound`] at render time.
    pub fn from_directory(path: impl AsRef<Path>) -> Self {
        let mut engine = Self::new();
        engine.template_dir = Some(path.as_ref().to_path_buf());
        engine
    }

    /// Template directory, if any.
    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    fn template_path(&self, name: &str) -> Option<PathBuf> {
        // names are flat; refuse anything that could leave the directory
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return None;
        }
        self.template_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.{}", name, TEMPLATE_EXTENSION)))
    }

    fn load_source(&self, name: &str) -> Result<String> {
        let path = self
            .template_path(name)
            .ok_or_else(|| MailError::TemplateNotFound(name.to_string()))?;

        match std::fs::read_to_string(&path) {
            Ok(source) => {
                debug!(template = name, path = %path.display(), "Loaded email template");
                Ok(source)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(MailError::TemplateNotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for HandlebarsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        if self.handlebars.has_template(name) {
            return Ok(self.handlebars.render(name, context)?);
        }

        let source = self.load_source(name)?;
        Ok(self.handlebars.render_template(&source, context)?)
    }

    fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
            || self.template_path(name).is_some_and(|path| path.is_file())
    }

    fn register_template(&mut self, name: &str, content: &str) -> Result<()> {
        self.handlebars.register_template_string(name, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn template_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("welcome_email.html"),
            "<p>Hi {{user_name}}, open <a href=\"{{dashboard_link}}\">your dashboard</a>.</p>",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_render_from_directory() {
        let dir = template_dir();
        let engine = HandlebarsEngine::from_directory(dir.path());

        let html = engine
            .render(
                "welcome_email",
                &json!({"user_name": "jane", "dashboard_link": "https://app.example.com/dashboard"}),
            )
            .unwrap();

        assert_eq!(
            html,
            "<p>Hi jane, open <a href=\"https://app.example.com/dashboard\">your dashboard</a>.</p>"
        );
        assert!(engine.has_template("welcome_email"));
        assert!(!engine.has_template("password_reset"));
    }

    #[test]
    fn test_file_changes_are_picked_up() {
        let dir = template_dir();
        let engine = HandlebarsEngine::from_directory(dir.path());

        fs::write(dir.path().join("welcome_email.html"), "<b>{{user_name}}</b>").unwrap();

        let html = engine.render("welcome_email", &json!({"user_name": "jane"})).unwrap();
        assert_eq!(html, "<b>jane</b>");
    }

    #[test]
    fn test_missing_template() {
        let dir = template_dir();
        let engine = HandlebarsEngine::from_directory(dir.path());

        let result = engine.render("account_locked", &json!({}));
        assert!(matches!(result, Err(MailError::TemplateNotFound(_))));

        let result = HandlebarsEngine::new().render("welcome_email", &json!({}));
        assert!(matches!(result, Err(MailError::TemplateNotFound(_))));
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = template_dir();
        let nested = dir.path().join("emails");
        fs::create_dir(&nested).unwrap();
        let engine = HandlebarsEngine::from_directory(&nested);

        let result = engine.render("../welcome_email", &json!({"user_name": "x"}));
        assert!(matches!(result, Err(MailError::TemplateNotFound(_))));
    }

    #[test]
    fn test_strict_mode_and_syntax_errors() {
        let mut engine = HandlebarsEngine::new();
        engine.register_template("strict", "{{missing}}").unwrap();
        assert!(matches!(
            engine.render("strict", &json!({})),
            Err(MailError::Template(_))
        ));

        assert!(matches!(
            engine.register_template("broken", "{{#if}}"),
            Err(MailError::Template(_))
        ));
    }

    #[test]
    fn test_escapes_html() {
        let mut engine = HandlebarsEngine::new();
        engine.register_template("name", "<p>{{user_name}}</p>").unwrap();

        let html = engine
            .render("name", &json!({"user_name": "<script>alert('x')</script>"}))
            .unwrap();

        assert!(html.starts_with("<p>&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
