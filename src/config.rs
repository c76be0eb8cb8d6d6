//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

use crate::locale::Locale;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
    /// Public URL the site is reachable at (e.g., "https://sayings.example.com")
    pub public_url: String,
}

impl ServerConfig {
    /// Public URL without a trailing slash
    pub fn base_url(&self) -> String {
        self.public_url.trim_end_matches('/').to_string()
    }
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Apply pending migrations on startup.
    ///
    /// When disabled the schema is created lazily by `POST /api/seed`.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

/// Site presentation settings
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site name shown in titles and the footer
    pub name: String,
    /// Locale used when negotiation finds no match
    #[serde(default)]
    pub default_locale: Locale,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (SAYINGS__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.public_url", "http://localhost:3000")?
            .set_default("database.path", "data/sayings.db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.run_migrations", true)?
            .set_default("site.name", "Sayings - Inspirational Quotes")?
            .set_default("site.default_locale", "en")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("SAYINGS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        let parsed = url::Url::parse(&self.server.public_url).map_err(|e| {
            crate::error::AppError::Config(format!("server.public_url is not a valid URL: {e}"))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(crate::error::AppError::Config(
                "server.public_url must use http or https".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(crate::error::AppError::Config(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            tracing::warn!(
                format = %self.logging.format,
                "Unknown logging.format; falling back to pretty"
            );
        }

        Ok(())
    }
}
