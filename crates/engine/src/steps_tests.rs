// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn a_completed_step_is_skipped_on_resume() {
    let state_dir = tempfile::tempdir().expect("tempdir");
    let cwd = tempfile::tempdir().expect("tempdir");
    let vars = VarScope::new();
    let step = InstallStep::new("touch-file", StepOp::Shell("touch marker".to_string()));

    let mut checkpoint = Checkpoint::load(state_dir.path(), "app-a").await.expect("load");
    let first = run_step(&step, cwd.path(), &vars, &mut checkpoint).await.expect("first run");
    assert!(!first.skipped);
    assert!(cwd.path().join("marker").exists());

    std::fs::remove_file(cwd.path().join("marker")).expect("remove marker");
    let mut reloaded = Checkpoint::load(state_dir.path(), "app-a").await.expect("reload");
    let second = run_step(&step, cwd.path(), &vars, &mut reloaded).await.expect("second run");
    assert!(second.skipped);
    assert!(!cwd.path().join("marker").exists(), "skipped step must not re-run the command");
}

#[tokio::test]
async fn a_failing_step_surfaces_an_external_failure_error() {
    let state_dir = tempfile::tempdir().expect("tempdir");
    let cwd = tempfile::tempdir().expect("tempdir");
    let vars = VarScope::new();
    let step = InstallStep::new("fail", StepOp::Shell("exit 3".to_string()));
    let mut checkpoint = Checkpoint::load(state_dir.path(), "app-b").await.expect("load");

    let err = run_step(&step, cwd.path(), &vars, &mut checkpoint).await.expect_err("nonzero exit");
    assert_eq!(err.kind, pinokio_core::ErrorKind::ExternalFailure);
    assert!(!checkpoint.is_done("fail"));
}

#[tokio::test]
async fn an_unresolved_variable_is_invalid_input() {
    let state_dir = tempfile::tempdir().expect("tempdir");
    let cwd = tempfile::tempdir().expect("tempdir");
    let vars = VarScope::new();
    let step = InstallStep::new("needs-var", StepOp::Shell("echo {missing}".to_string()));
    let mut checkpoint = Checkpoint::load(state_dir.path(), "app-c").await.expect("load");

    let err = run_step(&step, cwd.path(), &vars, &mut checkpoint).await.expect_err("missing var");
    assert_eq!(err.kind, pinokio_core::ErrorKind::InvalidInput);
}

#[tokio::test]
async fn ensure_dir_step_creates_the_directory() {
    let state_dir = tempfile::tempdir().expect("tempdir");
    let cwd = tempfile::tempdir().expect("tempdir");
    let vars = VarScope::new();
    let target = cwd.path().join("nested").join("dir");
    let step = InstallStep::new("make-dir", StepOp::EnsureDir(target.clone()));
    let mut checkpoint = Checkpoint::load(state_dir.path(), "app-d").await.expect("load");

    run_step(&step, cwd.path(), &vars, &mut checkpoint).await.expect("ensure dir");
    assert!(target.is_dir());
}

#[tokio::test]
async fn clearing_the_checkpoint_forgets_completed_steps() {
    let state_dir = tempfile::tempdir().expect("tempdir");
    let cwd = tempfile::tempdir().expect("tempdir");
    let vars = VarScope::new();
    let step = InstallStep::new("touch-file", StepOp::Shell("touch marker".to_string()));
    let mut checkpoint = Checkpoint::load(state_dir.path(), "app-e").await.expect("load");
    run_step(&step, cwd.path(), &vars, &mut checkpoint).await.expect("first run");
    assert!(checkpoint.is_done("touch-file"));

    checkpoint.clear().await.expect("clear");
    assert!(!checkpoint.is_done("touch-file"));
}
