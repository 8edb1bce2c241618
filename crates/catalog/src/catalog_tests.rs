use super::*;

fn sample_json() -> &'static str {
    r#"{
        "entries": [
            {"id": "app-sd-webui", "name": "Stable Diffusion WebUI", "category_hint": "image", "repo_url": "https://example.com/sd", "installer_hint": "requirements", "stars": 1200, "tags": ["image", "gradio"]},
            {"id": "app-llama", "name": "Llama Chat", "category_hint": "llm", "repo_url": "https://example.com/llama", "installer_hint": "json", "stars": 300, "tags": ["llm", "chat"]}
        ]
    }"#
}

#[tokio::test]
async fn load_and_find_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.json");
    tokio::fs::write(&path, sample_json()).await.expect("write");

    let catalog = Catalog::load(&path).await.expect("load");
    assert_eq!(catalog.entries.len(), 2);
    assert_eq!(catalog.find("app-llama").expect("found").name, "Llama Chat");
    assert!(catalog.find("app-missing").is_none());
}

#[tokio::test]
async fn search_matches_name_and_tags() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.json");
    tokio::fs::write(&path, sample_json()).await.expect("write");
    let catalog = Catalog::load(&path).await.expect("load");

    let by_name = catalog.search("llama");
    assert_eq!(by_name.len(), 1);

    let by_tag = catalog.search("gradio");
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].id, "app-sd-webui");
}

#[tokio::test]
async fn load_rejects_malformed_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.json");
    tokio::fs::write(&path, "not json").await.expect("write");

    let err = Catalog::load(&path).await.unwrap_err();
    assert_eq!(err.kind, pinokio_core::ErrorKind::Corrupt);
}
