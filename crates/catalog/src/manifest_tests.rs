use super::*;

#[tokio::test]
async fn extracts_requirements_txt_stripping_version_specs() {
    let dir = tempfile::tempdir().expect("tempdir");
    tokio::fs::write(dir.path().join("requirements.txt"), "torch==2.1.0\n# comment\nnumpy>=1.20\n-r other.txt\n")
        .await
        .expect("write");

    let deps = extract_deps(dir.path()).await;
    assert_eq!(deps.pip, vec!["numpy>=1.20".to_string(), "torch==2.1.0".to_string()]);
}

#[tokio::test]
async fn extracts_package_json_dependencies() {
    let dir = tempfile::tempdir().expect("tempdir");
    tokio::fs::write(
        dir.path().join("package.json"),
        r#"{"dependencies": {"express": "^4.0.0"}, "devDependencies": {"eslint": "^8.0.0"}}"#,
    )
    .await
    .expect("write");

    let deps = extract_deps(dir.path()).await;
    assert_eq!(deps.npm, vec!["eslint".to_string(), "express".to_string()]);
}

#[tokio::test]
async fn extracts_environment_yml_with_nested_pip_block() {
    let dir = tempfile::tempdir().expect("tempdir");
    tokio::fs::write(
        dir.path().join("environment.yml"),
        "name: demo\ndependencies:\n  - python=3.10\n  - pip:\n      - torch==2.1.0\n",
    )
    .await
    .expect("write");

    let deps = extract_deps(dir.path()).await;
    assert_eq!(deps.conda, vec!["python=3.10".to_string()]);
    assert_eq!(deps.pip, vec!["torch==2.1.0".to_string()]);
}

#[tokio::test]
async fn missing_manifests_yield_empty_deps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let deps = extract_deps(dir.path()).await;
    assert!(deps.is_empty());
}
