// Environment variable loading

use crate::{MailError, Result};
use std::env;

/// Process environment loader
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLoader;

impl EnvLoader {
    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(key).map_err(|e| MailError::Config(format!("{}: {}", key, e)))
    }

    /// Load a variable, treating unset and non-unicode values as absent
    pub fn get(&self, key: &str) -> Option<String> {
        self.load_var(key).ok()
    }
}
