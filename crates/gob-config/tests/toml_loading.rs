//! Integration tests for TOML and environment configuration loading.
//!
//! Uses figment::Jail for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use gob_config::DashboardConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_persistence_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[persistence]
dir = "./state"
debounce_wait_ms = 100
debounce_max_wait_ms = 400
redaction_patterns = ["(?i)token"]
persist_entity_cache = true
"#,
        )?;

        let config: DashboardConfig = Figment::from(Serialized::defaults(DashboardConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.persistence.dir, "./state");
        assert_eq!(config.persistence.debounce_wait_ms, 100);
        assert_eq!(config.persistence.debounce_max_wait_ms, 400);
        assert_eq!(config.persistence.redaction_patterns, ["(?i)token"]);
        assert!(config.persistence.persist_entity_cache);
        Ok(())
    });
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://gob.example.com"
"#,
        )?;

        let config: DashboardConfig = Figment::from(Serialized::defaults(DashboardConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.api.base_url, "https://gob.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.persistence.debounce_wait_ms, 500);
        assert_eq!(config.validation.debounce_ms, 250);
        assert!(config.realtime.refresh_on_reconnect);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[validation]
debounce_ms = 900
"#,
        )?;
        jail.set_env("GOB_VALIDATION__DEBOUNCE_MS", "50");
        jail.set_env("GOB_REALTIME__REFRESH_ON_RECONNECT", "false");

        let config: DashboardConfig = Figment::from(Serialized::defaults(DashboardConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("GOB_").split("__"))
            .extract()?;

        assert_eq!(config.validation.debounce_ms, 50);
        assert!(!config.realtime.refresh_on_reconnect);
        Ok(())
    });
}

#[test]
fn load_picks_up_project_file_in_cwd() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "gobyoall.toml",
            r#"
[api]
timeout_secs = 5
"#,
        )?;

        let config = DashboardConfig::load().expect("config loads");
        assert_eq!(config.api.timeout_secs, 5);
        Ok(())
    });
}

#[test]
fn load_from_explicit_file_is_validated() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[persistence]
debounce_wait_ms = 1000
debounce_max_wait_ms = 10
"#,
        )?;

        let result = DashboardConfig::load_from(std::path::Path::new("custom.toml"));
        assert!(result.is_err());
        Ok(())
    });
}
