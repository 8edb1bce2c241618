// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped variable substitution for installer scripts.
//!
//! Bare top-level names (`platform`, `gpu`, `cwd`, `port`, `timestamp`,
//! `cloud.base_path`) are seeded once per run; `args.*`, `local.*`, `env.*`
//! accumulate as the installer executes. Substitution is lexical, not
//! recursive: a resolved value is never re-scanned for further `{...}`
//! placeholders.

use std::collections::HashMap;

const SCOPE_PREFIXES: [&str; 3] = ["args.", "local.", "env."];

fn has_scope_prefix(key: &str) -> bool {
    SCOPE_PREFIXES.iter().any(|p| key.starts_with(p))
}

#[derive(Debug, Clone, Default)]
pub struct VarScope {
    vars: HashMap<String, String>,
}

impl VarScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run_context(platform: &str, gpu: &str, cwd: &str, port: Option<u16>, timestamp: i64, base_path: &str) -> Self {
        let mut scope = Self::new();
        scope.set("platform", platform);
        scope.set("gpu", gpu);
        scope.set("cwd", cwd);
        if let Some(port) = port {
            scope.set("port", port.to_string());
        }
        scope.set("timestamp", timestamp.to_string());
        scope.set("cloud.base_path", base_path);
        scope
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Merges `args.*`/`local.*`/`env.*` entries from a namespace map, each
    /// keyed under the given scope prefix (e.g. `namespace_vars("args",
    /// form_values)` populates `args.field_id`).
    pub fn namespace_vars(&mut self, scope: &str, values: &HashMap<String, String>) {
        for (k, v) in values {
            let key = if has_scope_prefix(k) { k.clone() } else { format!("{scope}.{k}") };
            self.vars.insert(key, v.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Substitutes every `{key}` or `{key:default}` placeholder in `template`.
    /// A key with no entry and no `:default` fails with the missing key name
    /// so the caller can report which variable was unresolved.
    pub fn expand(&self, template: &str) -> Result<String, String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let Some(close_rel) = rest[open..].find('}') else {
                out.push_str(&rest[open..]);
                rest = "";
                break;
            };
            let close = open + close_rel;
            let inner = &rest[open + 1..close];
            let (key, default) = match inner.split_once(':') {
                Some((k, d)) => (k, Some(d)),
                None => (inner, None),
            };
            match self.get(key).or(default) {
                Some(value) => out.push_str(value),
                None => return Err(key.to_string()),
            }
            rest = &rest[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
#[path = "vars_tests.rs"]
mod tests;
