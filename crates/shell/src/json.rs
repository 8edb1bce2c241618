// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic, schema-validated JSON read/write. Preserves numeric
//! precision and roundtrips unknown fields: validation inspects a
//! [`serde_json::Value`] parse before deserializing into the caller's type,
//! so it never re-serializes (and thus never drops) unknown keys itself —
//! that's left to the caller's `serde(default)`-annotated struct.

use crate::error::ShellError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Bool,
    Array,
    Object,
}

impl FieldKind {
    fn matches(self, value: &serde_json::Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Array => value.is_array(),
            FieldKind::Object => value.is_object(),
        }
    }
}

/// A minimal schema descriptor: field kinds plus the required set (spec
/// §4.B). Not a full JSON-schema implementation — just enough to catch
/// corrupt on-disk records before they reach `serde`'s stricter (and less
/// diagnosable) type errors.
#[derive(Debug, Clone, Default)]
pub struct JsonSchema {
    pub fields: HashMap<String, FieldKind>,
    pub required: Vec<String>,
}

impl JsonSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    fn validate(&self, path: &Path, value: &serde_json::Value) -> Result<(), ShellError> {
        let obj = value.as_object().ok_or_else(|| ShellError::Corrupt {
            path: path.to_path_buf(),
            message: "expected a JSON object at the document root".to_string(),
        })?;

        for name in &self.required {
            if !obj.contains_key(name) {
                return Err(ShellError::Corrupt {
                    path: path.to_path_buf(),
                    message: format!("missing required field `{name}`"),
                });
            }
        }

        for (name, kind) in &self.fields {
            if let Some(v) = obj.get(name) {
                if !kind.matches(v) {
                    return Err(ShellError::Corrupt {
                        path: path.to_path_buf(),
                        message: format!("field `{name}` has the wrong JSON type"),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Reads and validates a JSON file against `schema`, then deserializes it.
pub async fn read_validated<T: DeserializeOwned>(
    path: &Path,
    schema: &JsonSchema,
) -> Result<T, ShellError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| ShellError::from_io(path, e))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| ShellError::Corrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    schema.validate(path, &value)?;
    serde_json::from_value(value).map_err(|e| ShellError::Corrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Serializes `value` and writes it atomically. `serde_json`
/// preserves numeric precision and round-trips unknown fields on values
/// that carry a `#[serde(flatten)]` catch-all, which is the pattern callers
/// use for forward-compatible records.
pub async fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ShellError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| ShellError::Corrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    crate::fs::atomic_write(path, &bytes).await
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
