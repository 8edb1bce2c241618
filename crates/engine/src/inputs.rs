// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed install-time input forms.
//!
//! An installer may declare a form of fields the operator fills in before
//! an install proceeds (a repo URL, a HuggingFace token, a model size
//! select). Validation runs before any filesystem or network side effect,
//! so a bad form aborts with `InvalidInput` before anything is touched.

use pinokio_core::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Bool,
    Select,
    Multiselect,
    File,
    Dir,
    Url,
    Email,
    Password,
    Textarea,
    Range,
    Date,
    Time,
    Datetime,
    Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    Required,
    Min(f64),
    Max(f64),
    Regex(String),
    OneOf(Vec<String>),
    /// File or dir must already exist on disk.
    PathExists,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field_id: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub validators: Vec<Validator>,
    pub default: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// A submitted value for one field, always carried as a string; typed
/// interpretation (number, bool, list) happens during validation.
pub type FormValues = HashMap<String, String>;

fn resolve_value<'a>(field: &'a FieldSpec, values: &'a FormValues) -> Option<&'a str> {
    values.get(&field.field_id).map(String::as_str).or(field.default.as_deref())
}

fn validate_one(field: &FieldSpec, value: Option<&str>) -> Result<(), Error> {
    for validator in &field.validators {
        match validator {
            Validator::Required => {
                if value.map(str::trim).unwrap_or("").is_empty() {
                    return Err(invalid(field, "field is required"));
                }
            }
            Validator::Min(min) => {
                let Some(value) = value else { continue };
                let parsed: f64 = value.parse().map_err(|_| invalid(field, "expected a number"))?;
                if parsed < *min {
                    return Err(invalid(field, format!("must be >= {min}")));
                }
            }
            Validator::Max(max) => {
                let Some(value) = value else { continue };
                let parsed: f64 = value.parse().map_err(|_| invalid(field, "expected a number"))?;
                if parsed > *max {
                    return Err(invalid(field, format!("must be <= {max}")));
                }
            }
            Validator::Regex(pattern) => {
                let Some(value) = value else { continue };
                let re = regex::Regex::new(pattern).map_err(|e| invalid(field, format!("invalid validator regex: {e}")))?;
                if !re.is_match(value) {
                    return Err(invalid(field, format!("does not match pattern {pattern}")));
                }
            }
            Validator::OneOf(choices) => {
                let Some(value) = value else { continue };
                if !value.split(',').all(|v| choices.iter().any(|c| c == v)) {
                    return Err(invalid(field, format!("must be one of {choices:?}")));
                }
            }
            Validator::PathExists => {
                let Some(value) = value else { continue };
                if !std::path::Path::new(value).exists() {
                    return Err(invalid(field, format!("path does not exist: {value}")));
                }
            }
        }
    }
    match field.kind {
        FieldKind::Number | FieldKind::Range => {
            if let Some(value) = value {
                if !value.is_empty() && value.parse::<f64>().is_err() {
                    return Err(invalid(field, "expected a number"));
                }
            }
        }
        FieldKind::Bool => {
            if let Some(value) = value {
                if !value.is_empty() && value.parse::<bool>().is_err() {
                    return Err(invalid(field, "expected true or false"));
                }
            }
        }
        FieldKind::Email => {
            if let Some(value) = value {
                if !value.is_empty() && !(value.contains('@') && value.split('@').nth(1).is_some_and(|d| d.contains('.'))) {
                    return Err(invalid(field, "expected a valid email address"));
                }
            }
        }
        FieldKind::Url => {
            if let Some(value) = value {
                if !value.is_empty() && !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(invalid(field, "expected an http(s) URL"));
                }
            }
        }
        FieldKind::File | FieldKind::Dir => {
            if let Some(value) = value {
                if !value.is_empty() {
                    let path = std::path::Path::new(value);
                    let ok = match field.kind {
                        FieldKind::File => path.is_file(),
                        FieldKind::Dir => path.is_dir(),
                        _ => unreachable!(),
                    };
                    if !ok {
                        return Err(invalid(field, format!("{} does not exist: {value}", field.kind.as_str())));
                    }
                }
            }
        }
        _ => {}
    }
    Ok(())
}

impl FieldKind {
    fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Bool => "bool",
            FieldKind::Select => "select",
            FieldKind::Multiselect => "multiselect",
            FieldKind::File => "file",
            FieldKind::Dir => "dir",
            FieldKind::Url => "url",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Textarea => "textarea",
            FieldKind::Range => "range",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::Datetime => "datetime",
            FieldKind::Color => "color",
        }
    }
}

fn invalid(field: &FieldSpec, message: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::InvalidInput, format!("{}: {message}", field.field_id))
}

/// Validates every field in `form` against `values`, in declaration order,
/// aborting on the first irrecoverable failure. Fields listed in a later
/// field's `depends_on` are skipped if the dependency resolved empty.
pub fn validate_form(form: &[FieldSpec], values: &FormValues) -> Result<FormValues, Error> {
    let mut resolved = FormValues::new();
    for field in form {
        if field.depends_on.iter().any(|dep| resolved.get(dep).map(String::as_str).unwrap_or("").is_empty()) {
            continue;
        }
        let value = resolve_value(field, values);
        validate_one(field, value)?;
        if let Some(value) = value {
            resolved.insert(field.field_id.clone(), value.to_string());
        }
    }
    Ok(resolved)
}

#[cfg(test)]
#[path = "inputs_tests.rs"]
mod tests;
