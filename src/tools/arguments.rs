//! Typed access to tool call arguments.

use crate::error::{CounselError, ValidationError};

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    /// Wrap call arguments. Some providers deliver arguments as a JSON
    /// encoded string; those are decoded here.
    pub fn new(value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    serde_json::json!({})
                } else {
                    serde_json::from_str(trimmed).unwrap_or(serde_json::Value::String(raw))
                }
            }
            other => other,
        };
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get an array argument.
    pub fn get_array(&self, key: &str) -> Result<&Vec<serde_json::Value>, CounselError> {
        let value = self.require(key)?;
        value
            .as_array()
            .ok_or_else(|| ValidationError::type_mismatch(key, "array", value).into())
    }

    fn require(&self, key: &str) -> Result<&serde_json::Value, CounselError> {
        self.value
            .get(key)
            .ok_or_else(|| ValidationError::value(key, "missing required argument").into())
    }
}
