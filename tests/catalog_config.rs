// tests/catalog_config.rs
use content_catalog::config::{
    CatalogConfig, DEFAULT_POSTS_PATH, ENV_CONFIG_PATH, ENV_CONTENT_API_TIMEOUT_SECS,
    ENV_CONTENT_API_URL,
};
use content_catalog::ContentEngine;
use std::{env, fs};

fn clear_env() {
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_CONTENT_API_URL);
    env::remove_var(ENV_CONTENT_API_TIMEOUT_SECS);
}

#[test]
fn load_from_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("catalog.toml");
    fs::write(
        &p_toml,
        r#"
related_limit = 0

[remote]
base_url = "https://cms.example.com"
"#,
    )
    .unwrap();
    let cfg = CatalogConfig::load_from(&p_toml).unwrap();
    assert_eq!(cfg.remote.base_url.as_deref(), Some("https://cms.example.com"));
    assert_eq!(cfg.remote.posts_path, DEFAULT_POSTS_PATH);
    // Zero is sanitized back to the default.
    assert_eq!(cfg.related_limit, 3);

    let p_json = dir.path().join("catalog.json");
    fs::write(&p_json, r#"{"related_limit": 5, "remote": {"posts_path": "/v2/posts"}}"#).unwrap();
    let cfg = CatalogConfig::load_from(&p_json).unwrap();
    assert_eq!(cfg.related_limit, 5);
    assert_eq!(cfg.remote.base_url, None);
    assert_eq!(cfg.remote.posts_path, "/v2/posts");
}

#[test]
fn invalid_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("catalog.toml");
    fs::write(&p, "related_limit = \"many\"").unwrap();
    assert!(CatalogConfig::load_from(&p).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not read.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing → defaults, remote disabled.
    let cfg = CatalogConfig::load_default().unwrap();
    assert_eq!(cfg, CatalogConfig::default());

    // 2) Fallback TOML in ./config/
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(tmp.path().join("config/catalog.toml"), "related_limit = 4").unwrap();
    assert_eq!(CatalogConfig::load_default().unwrap().related_limit, 4);

    // 3) Env path wins.
    let p_env = tmp.path().join("override.json");
    fs::write(&p_env, r#"{"related_limit": 6}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(CatalogConfig::load_default().unwrap().related_limit, 6);

    // 4) Env path pointing nowhere is an error.
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(CatalogConfig::load_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn env_overrides_remote_settings() {
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    env::set_var(ENV_CONTENT_API_URL, " https://cms.example.com/api ");
    env::set_var(ENV_CONTENT_API_TIMEOUT_SECS, "7");
    let cfg = CatalogConfig::load_default().unwrap();
    assert_eq!(cfg.remote.base_url.as_deref(), Some("https://cms.example.com/api"));
    assert_eq!(cfg.remote.timeout_secs, Some(7));

    env::set_var(ENV_CONTENT_API_TIMEOUT_SECS, "soon");
    assert!(CatalogConfig::load_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn engine_from_config_uses_bundled_override() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("posts.json");
    fs::write(
        &data,
        r#"[{"slug": "only", "publishedAt": "2025-01-01", "status": "published"}]"#,
    )
    .unwrap();

    let mut cfg = CatalogConfig::default();
    cfg.bundled_path = Some(data);
    cfg.related_limit = 2;
    let engine = ContentEngine::from_config(&cfg).unwrap();
    assert_eq!(engine.resolver().bundled().len(), 1);
    assert_eq!(engine.related_limit(), 2);
    assert_eq!(engine.resolve_visible().len(), 1);
}
