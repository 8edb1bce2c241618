use super::*;
use pinokio_core::profile::{Complexity, InstallerKind, UiKind};

async fn sample_app(dir: &Path) {
    tokio::fs::write(dir.join("requirements.txt"), "gradio==4.0.0\ntorch==2.1.0\n").await.expect("write");
    tokio::fs::write(dir.join("app.py"), "import gradio as gr\ndemo = gr.Blocks()\n").await.expect("write");
}

#[tokio::test]
async fn analyze_classifies_installer_ui_and_deps() {
    let dir = tempfile::tempdir().expect("tempdir");
    sample_app(dir.path()).await;
    let analyzer = Analyzer::new();
    let app_id = AppId::from("app-demo");

    let profile = analyzer.analyze(&app_id, dir.path(), AppCategory::Image).await.expect("analyze");
    assert_eq!(profile.installer_kind, InstallerKind::Requirements);
    assert_eq!(profile.ui_kind, UiKind::Gradio);
    assert!(profile.needs_tunnel);
    assert!(profile.deps.pip.iter().any(|d| d.starts_with("torch")));
}

#[tokio::test]
async fn analyze_returns_cached_profile_for_unchanged_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    sample_app(dir.path()).await;
    let analyzer = Analyzer::new();
    let app_id = AppId::from("app-demo");

    let first = analyzer.analyze(&app_id, dir.path(), AppCategory::Image).await.expect("first analyze");
    let second = analyzer.analyze(&app_id, dir.path(), AppCategory::Image).await.expect("second analyze");
    assert_eq!(first.hash, second.hash);
}

#[tokio::test]
async fn analyze_reflects_source_tree_changes_in_the_hash() {
    let dir = tempfile::tempdir().expect("tempdir");
    sample_app(dir.path()).await;
    let analyzer = Analyzer::new();
    let app_id = AppId::from("app-demo");

    let first = analyzer.analyze(&app_id, dir.path(), AppCategory::Image).await.expect("first analyze");
    tokio::fs::write(dir.path().join("requirements.txt"), "gradio==4.0.0\ntorch==2.1.0\nnumpy==1.26.0\n")
        .await
        .expect("rewrite");
    let second = analyzer.analyze(&app_id, dir.path(), AppCategory::Image).await.expect("second analyze");
    assert_ne!(first.hash, second.hash);
}

#[tokio::test]
async fn a_trivial_app_is_classified_simple() {
    let dir = tempfile::tempdir().expect("tempdir");
    tokio::fs::write(dir.path().join("requirements.txt"), "requests==2.31.0\n").await.expect("write");
    let analyzer = Analyzer::new();
    let profile =
        analyzer.analyze(&AppId::from("app-tiny"), dir.path(), AppCategory::Utility).await.expect("analyze");
    assert_eq!(profile.complexity, Complexity::Simple);
}
