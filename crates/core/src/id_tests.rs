use super::*;

#[test]
fn app_id_from_str_roundtrips() {
    let id: AppId = "stable-diffusion-webui".into();
    assert_eq!(id.as_str(), "stable-diffusion-webui");
    assert_eq!(id.to_string(), "stable-diffusion-webui");
}

#[test]
fn generated_ids_carry_conventional_prefix() {
    assert!(ProcessId::generate().as_str().starts_with("proc-"));
    assert!(TunnelId::generate().as_str().starts_with("tun-"));
    assert!(AlertId::generate().as_str().starts_with("alert-"));
}

#[test]
fn generated_ids_are_unique() {
    let a = ProcessId::generate();
    let b = ProcessId::generate();
    assert_ne!(a, b);
}

#[test]
fn ids_usable_as_hashmap_keys_by_str() {
    use std::collections::HashMap;
    let mut map: HashMap<AppId, u32> = HashMap::new();
    map.insert(AppId::new("foo"), 1);
    assert_eq!(map.get("foo"), Some(&1));
}
