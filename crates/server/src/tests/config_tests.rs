use super::*;

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    assert_eq!(load_settings_from(None, env_from(&[])), Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
bind_addr = "0.0.0.0:8080"
seed_demo_tasks = true
"#;
    let settings = load_settings_from(Some(raw), env_from(&[]));
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert!(settings.seed_demo_tasks);
    assert_eq!(settings.max_body_bytes, Settings::default().max_body_bytes);
}

#[test]
fn env_overrides_file() {
    let raw = r#"bind_addr = "0.0.0.0:8080""#;
    let settings = load_settings_from(
        Some(raw),
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("APP__SEED_DEMO_TASKS", "yes"),
            ("APP__MAX_BODY_BYTES", "not-a-number"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert!(settings.seed_demo_tasks);
    assert_eq!(settings.max_body_bytes, Settings::default().max_body_bytes);
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let settings = load_settings_from(Some("bind_addr = ["), env_from(&[]));
    assert_eq!(settings, Settings::default());
}
