use super::*;

#[test]
fn installer_kind_prefers_install_json() {
    let files = vec!["install.json".to_string(), "requirements.txt".to_string()];
    assert_eq!(classify_installer_kind(&files), InstallerKind::Json);
}

#[test]
fn installer_kind_falls_back_to_requirements() {
    let files = vec!["requirements.txt".to_string(), "readme.md".to_string()];
    assert_eq!(classify_installer_kind(&files), InstallerKind::Requirements);
}

#[test]
fn installer_kind_unknown_when_nothing_recognized() {
    let files = vec!["readme.md".to_string()];
    assert_eq!(classify_installer_kind(&files), InstallerKind::Unknown);
}

#[test]
fn ui_kind_detects_gradio_from_import_and_symbol() {
    let sources = vec!["import gradio as gr\ndemo = gr.Blocks()".to_string()];
    assert_eq!(classify_ui_kind(&sources), UiKind::Gradio);
}

#[test]
fn ui_kind_is_none_when_no_sources_scanned() {
    assert_eq!(classify_ui_kind(&[]), UiKind::None);
}

#[test]
fn ui_kind_is_custom_when_sources_scanned_but_no_signal_fires() {
    let sources = vec!["print('hello world')".to_string()];
    assert_eq!(classify_ui_kind(&sources), UiKind::Custom);
}

#[test]
fn ui_kind_picks_highest_total_when_multiple_fire() {
    let sources = vec!["import streamlit as st\nst.write('hi')".to_string(), "import dash".to_string()];
    assert_eq!(classify_ui_kind(&sources), UiKind::Streamlit);
}
