use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::models::PatchSemantics;

/// Environment variables and the settings keys they override.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_READ_TIMEOUT", "server.read_timeout_secs"),
    ("SERVER_WRITE_TIMEOUT", "server.write_timeout_secs"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USERNAME", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("DB_SSL_MODE", "database.ssl_mode"),
    ("DB_POOL_SIZE", "database.pool_size"),
    ("DB_TIMEOUT", "database.timeout_seconds"),
    ("DB_RUN_MIGRATIONS", "database.run_migrations"),
    ("API_LEGACY_PATCH_SEMANTICS", "api.legacy_patch_semantics"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub pool_size: u32,
    pub timeout_seconds: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub legacy_patch_semantics: bool,
}

impl Settings {
    /// Loads `.env`, the optional `appsettings` file and process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_sources(Some("appsettings"), |key| std::env::var(key).ok())
    }

    /// Builds settings from defaults, an optional config file and a variable
    /// lookup. Empty variables count as unset.
    pub fn from_sources<F>(file: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.read_timeout_secs", 30)?
            .set_default("server.write_timeout_secs", 30)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "postgres")?
            .set_default("database.name", "ecommerce")?
            .set_default("database.ssl_mode", "disable")?
            .set_default("database.pool_size", 10)?
            .set_default("database.timeout_seconds", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("api.legacy_patch_semantics", false)?;

        if let Some(name) = file {
            builder = builder.add_source(File::with_name(name).required(false));
        }

        for (var, key) in ENV_OVERRIDES {
            let value = lookup(var).filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn patch_semantics(&self) -> PatchSemantics {
        if self.api.legacy_patch_semantics {
            PatchSemantics::Legacy
        } else {
            PatchSemantics::Explicit
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl DatabaseSettings {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.name, self.ssl_mode
        )
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
