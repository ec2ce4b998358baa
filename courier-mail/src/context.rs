//! Template context values.

use serde::Serialize;
use serde_json::{Map, Value};

/// Substitution variables for a single render.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, replacing any previous value for `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a raw value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Convert into a JSON object for the template engine.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_values() {
        let context = Context::new()
            .with("user_name", "jane.doe")
            .with("failed_attempts", 5)
            .with("current_year", 2026);

        assert_eq!(context.get_str("user_name"), Some("jane.doe"));
        assert_eq!(context.get_str("failed_attempts"), None);
        assert_eq!(context.get("failed_attempts"), Some(&json!(5)));
        assert_eq!(
            context.to_value(),
            json!({"user_name": "jane.doe", "failed_attempts": 5, "current_year": 2026})
        );
    }
}
