use std::path::Path;

use thiserror::Error;

mod schema;

pub use schema::{
    AuthConfig, CURRENT_CONFIG_VERSION, Config, DatabaseConfig, LifecycleConfig, ReopenPolicy,
    ServerConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Will always return config, falling back to defaults on missing/invalid files.
pub fn load_config_from_file(config_path: &Path) -> Config {
    match std::fs::read_to_string(config_path) {
        Ok(raw_config) => Config::from_raw(&raw_config),
        Err(err) => {
            if err.kind() == std::io::ErrorKind::NotFound {
                tracing::info!(path = %config_path.display(), "No config file found, using defaults");
            } else {
                tracing::warn!("Failed to read config file: {}", err);
            }
            Config::default()
        }
    }
}

/// File config with the process environment applied on top.
pub fn load_config(config_path: &Path) -> Config {
    load_config_from_file(config_path).with_env_overrides(|name| std::env::var(name).ok())
}

pub fn config_json_schema() -> Result<String, ConfigError> {
    let schema = schemars::schema_for!(Config);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use test_support::{TestEnvGuard, temp_dir};

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = temp_dir();
        let config = load_config_from_file(&dir.path().join("config.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.lifecycle.reopen_policy, ReopenPolicy::Clear);
        assert!(config.lifecycle.record_noop_transitions);
        assert!(!config.lifecycle.rebind_sla_on_priority_change);
    }

    #[test]
    fn invalid_json_yields_defaults() {
        assert_eq!(Config::from_raw("{ not json"), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_raw(
            r#"{ "lifecycle": { "reopenPolicy": "RETAIN", "rebind_sla_on_priority_change": true } }"#,
        );
        assert_eq!(config.lifecycle.reopen_policy, ReopenPolicy::Retain);
        assert!(config.lifecycle.rebind_sla_on_priority_change);
        assert!(config.lifecycle.record_noop_transitions);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = temp_dir();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "server": { "port": 4100 }, "lifecycle": { "record_noop_transitions": false } }"#,
        )
        .unwrap();

        let config = load_config_from_file(&path);
        assert_eq!(config.server.port, 4100);
        assert!(!config.lifecycle.record_noop_transitions);
        assert_eq!(config.database, DatabaseConfig::default());
    }

    #[test]
    fn env_overrides_apply_in_order() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://localhost/helpdesk"),
            ("PORT", "3000"),
            ("BACKEND_PORT", "4000"),
            ("HELPDESK_JWT_SECRET", "  s3cret "),
        ]);
        let config =
            Config::default().with_env_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.database.url, "postgres://localhost/helpdesk");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert!(!config.auth.uses_default_secret());
    }

    #[test]
    fn bad_port_is_ignored() {
        let config = Config::default().with_env_overrides(|name| {
            (name == "PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.server.port, ServerConfig::default().port);
    }

    #[test]
    fn load_config_reads_process_env() {
        let dir = temp_dir();
        let _guard = TestEnvGuard::new(&[("DATABASE_URL", Some("sqlite::memory:")), ("PORT", None), ("BACKEND_PORT", None)]);
        let config = load_config(&dir.path().join("absent.json"));
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn schema_mentions_lifecycle() {
        let schema = config_json_schema().unwrap();
        assert!(schema.contains("reopen_policy"));
    }
}
