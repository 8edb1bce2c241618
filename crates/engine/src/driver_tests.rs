// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pinokio_core::test_support::AppProfileBuilder;
use pinokio_core::Deps;

fn deps(pip: &[&str]) -> Deps {
    Deps { pip: pip.iter().map(|s| s.to_string()).collect(), ..Default::default() }
}

#[test]
fn requirements_installer_emits_one_step_per_nonempty_dep_kind() {
    let profile = AppProfileBuilder::new("app-a")
        .installer_kind(InstallerKind::Requirements)
        .deps(deps(&["torch", "diffusers"]))
        .build();
    let dir = tempfile::tempdir().expect("tempdir");
    let vars = VarScope::new();
    let steps = build_steps(&profile, dir.path(), &vars, None).expect("steps");
    assert_eq!(steps.len(), 1);
    match &steps[0].op {
        StepOp::PipInstall(pkgs) => assert_eq!(pkgs, &vec!["torch".to_string(), "diffusers".to_string()]),
        other => panic!("unexpected op: {other:?}"),
    }
}

#[test]
fn js_installer_without_an_interpreter_is_unsupported() {
    let profile = AppProfileBuilder::new("app-b").installer_kind(InstallerKind::Js).build();
    let dir = tempfile::tempdir().expect("tempdir");
    let vars = VarScope::new();
    let err = build_steps(&profile, dir.path(), &vars, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unsupported);
}

#[test]
fn script_installer_finds_install_sh_in_the_app_root() {
    let profile = AppProfileBuilder::new("app-c").installer_kind(InstallerKind::Script).build();
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("install.sh"), "#!/bin/sh\necho hi\n").expect("write script");
    let vars = VarScope::new();
    let steps = build_steps(&profile, dir.path(), &vars, None).expect("steps");
    assert_eq!(steps.len(), 1);
    match &steps[0].op {
        StepOp::ShellScript(path) => assert_eq!(path.file_name().unwrap(), "install.sh"),
        other => panic!("unexpected op: {other:?}"),
    }
}

#[test]
fn script_installer_without_a_script_present_is_not_found() {
    let profile = AppProfileBuilder::new("app-d").installer_kind(InstallerKind::Script).build();
    let dir = tempfile::tempdir().expect("tempdir");
    let vars = VarScope::new();
    let err = build_steps(&profile, dir.path(), &vars, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[test]
fn unknown_installer_kind_is_unsupported() {
    let profile = AppProfileBuilder::new("app-e").installer_kind(InstallerKind::Unknown).build();
    let dir = tempfile::tempdir().expect("tempdir");
    let vars = VarScope::new();
    let err = build_steps(&profile, dir.path(), &vars, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unsupported);
}

#[test]
fn environment_installer_prepends_conda_env_file_when_present() {
    let profile = AppProfileBuilder::new("app-f")
        .installer_kind(InstallerKind::Environment)
        .deps(deps(&["torch"]))
        .build();
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("environment.yaml"), "name: app-f\n").expect("write env file");
    let vars = VarScope::new();
    let steps = build_steps(&profile, dir.path(), &vars, None).expect("steps");
    assert!(matches!(steps[0].op, StepOp::CondaEnvFile(_)));
}
