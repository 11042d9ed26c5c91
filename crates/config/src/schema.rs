use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

pub const CURRENT_CONFIG_VERSION: &str = "v1";

const DEFAULT_DATABASE_URL: &str = "sqlite://helpdesk.sqlite?mode=rwc";
const DEFAULT_JWT_SECRET: &str = "change-me";

/// What happens to `resolved_at` when a resolved ticket is reopened.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, EnumString, Display,
    Default,
)]
#[ts(use_ts_enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReopenPolicy {
    #[default]
    Clear,
    Retain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[serde(default)]
pub struct AuthConfig {
    #[serde(alias = "jwtSecret")]
    pub jwt_secret: String,
    #[serde(alias = "tokenTtlHours")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_hours: 24,
        }
    }
}

impl AuthConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[serde(default)]
pub struct LifecycleConfig {
    #[serde(alias = "reopenPolicy")]
    pub reopen_policy: ReopenPolicy,
    #[serde(alias = "recordNoopTransitions")]
    pub record_noop_transitions: bool,
    #[serde(alias = "rebindSlaOnPriorityChange")]
    pub rebind_sla_on_priority_change: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            reopen_policy: ReopenPolicy::Clear,
            record_noop_transitions: true,
            rebind_sla_on_priority_change: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[serde(default)]
pub struct Config {
    pub config_version: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub lifecycle: LifecycleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION.to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            lifecycle: LifecycleConfig::default(),
        }
    }
}

impl Config {
    pub fn from_raw(raw_config: &str) -> Self {
        match serde_json::from_str::<Config>(raw_config) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse config (line {}, column {}): {}, using default",
                    e.line(),
                    e.column(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.config_version = CURRENT_CONFIG_VERSION.to_string();

        if self.database.url.trim().is_empty() {
            tracing::warn!("Empty database url, resetting to default");
            self.database.url = DEFAULT_DATABASE_URL.to_string();
        }

        if self.auth.jwt_secret.trim().is_empty() {
            tracing::warn!("Empty JWT secret, resetting to default");
            self.auth.jwt_secret = DEFAULT_JWT_SECRET.to_string();
        }

        if self.auth.token_ttl_hours <= 0 {
            self.auth.token_ttl_hours = AuthConfig::default().token_ttl_hours;
        }

        self
    }

    /// Overlays process environment variables onto the file configuration.
    ///
    /// `BACKEND_PORT` wins over `PORT`; unparsable ports are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = non_empty("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(host) = non_empty("HOST") {
            self.server.host = host;
        }
        if let Some(raw) = non_empty("BACKEND_PORT").or_else(|| non_empty("PORT")) {
            match raw.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(err) => tracing::warn!(value = %raw, error = %err, "Invalid port; keeping {}", self.server.port),
            }
        }
        if let Some(secret) = non_empty("HELPDESK_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }

        self
    }
}
