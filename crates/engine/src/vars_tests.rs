// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn bare_names_resolve() {
    let scope = VarScope::with_run_context("colab", "t4", "/workspace/apps/demo", Some(7860), 1700000000, "/content/pinokio");
    assert_eq!(scope.expand("{platform}:{gpu}").unwrap(), "colab:t4");
    assert_eq!(scope.expand("port={port}").unwrap(), "port=7860");
    assert_eq!(scope.expand("{cloud.base_path}/models").unwrap(), "/content/pinokio/models");
}

#[test]
fn namespaced_values_are_keyed_by_scope() {
    let mut scope = VarScope::new();
    let mut args = HashMap::new();
    args.insert("repo".to_string(), "https://example.com/repo.git".to_string());
    scope.namespace_vars("args", &args);
    assert_eq!(scope.expand("{args.repo}").unwrap(), "https://example.com/repo.git");
}

#[test]
fn already_scoped_keys_are_not_double_prefixed() {
    let mut scope = VarScope::new();
    let mut values = HashMap::new();
    values.insert("env.PATH".to_string(), "/usr/bin".to_string());
    scope.namespace_vars("args", &values);
    assert_eq!(scope.get("env.PATH"), Some("/usr/bin"));
    assert_eq!(scope.get("args.env.PATH"), None);
}

#[test]
fn missing_key_without_default_fails_with_the_key_name() {
    let scope = VarScope::new();
    let err = scope.expand("{missing}").unwrap_err();
    assert_eq!(err, "missing");
}

#[test]
fn missing_key_with_default_falls_back() {
    let scope = VarScope::new();
    assert_eq!(scope.expand("{missing:fallback}").unwrap(), "fallback");
}

#[test]
fn unterminated_brace_is_passed_through_literally() {
    let scope = VarScope::new();
    assert_eq!(scope.expand("echo {oops").unwrap(), "echo {oops");
}

#[test]
fn multiple_placeholders_in_one_template() {
    let mut scope = VarScope::new();
    scope.set("cwd", "/workspace");
    scope.set("port", "8080");
    assert_eq!(scope.expand("cd {cwd} && serve --port {port}").unwrap(), "cd /workspace && serve --port 8080");
}
