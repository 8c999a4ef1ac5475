//! Configuration module for Caixa-Preta.

use serde::Deserialize;
use std::path::Path;

use crate::{CaixaError, Result};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the web server.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve the dashboard.
    #[serde(default = "default_serve_static")]
    pub serve_static: bool,
    /// Path to the dashboard's static files.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

fn default_serve_static() -> bool {
    true
}

fn default_static_path() -> String {
    "web/static".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            serve_static: default_serve_static(),
            static_path: default_static_path(),
        }
    }
}

/// Identity provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used to verify session tokens issued by the identity provider.
    #[serde(default)]
    pub jwt_secret: String,
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Create a user row for a verified identity that has none yet.
    #[serde(default)]
    pub auto_provision_users: bool,
}

fn default_session_cookie() -> String {
    "caixa_session".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_cookie: default_session_cookie(),
            auto_provision_users: false,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/caixa.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the object store.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Externally reachable base URL that signed links are built on.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Secret used to sign download links.
    #[serde(default)]
    pub signing_secret: String,
}

fn default_storage_path() -> String {
    "data/objects".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            public_base_url: default_public_base_url(),
            signing_secret: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty logs to stdout only.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/caixa.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web server configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Identity provider configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CaixaError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CaixaError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CAIXA_JWT_SECRET`: identity provider token secret
    /// - `CAIXA_STORAGE_SIGNING_SECRET`: download link signing secret
    /// - `CAIXA_DATABASE_PATH`: SQLite database path
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = non_empty_env("CAIXA_JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Some(v) = non_empty_env("CAIXA_STORAGE_SIGNING_SECRET") {
            self.storage.signing_secret = v;
        }
        if let Some(v) = non_empty_env("CAIXA_DATABASE_PATH") {
            self.database.path = v;
        }
    }

    /// Validate the configuration.
    ///
    /// Both secrets must be set and the public base URL must parse.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(CaixaError::Config(
                "auth.jwt_secret is not set. \
                 Set it in config.toml or via CAIXA_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.storage.signing_secret.is_empty() {
            return Err(CaixaError::Config(
                "storage.signing_secret is not set. \
                 Set it in config.toml or via CAIXA_STORAGE_SIGNING_SECRET environment variable."
                    .to_string(),
            ));
        }
        url::Url::parse(&self.storage.public_base_url).map_err(|e| {
            CaixaError::Config(format!(
                "storage.public_base_url is invalid ({}): {e}",
                self.storage.public_base_url
            ))
        })?;
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.auth.jwt_secret = "idp-secret".to_string();
        config.storage.signing_secret = "link-secret".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 8080);
        assert!(config.web.cors_origins.is_empty());
        assert!(config.web.serve_static);
        assert_eq!(config.web.static_path, "web/static");

        assert!(config.auth.jwt_secret.is_empty());
        assert_eq!(config.auth.session_cookie, "caixa_session");
        assert!(!config.auth.auto_provision_users);

        assert_eq!(config.database.path, "data/caixa.db");

        assert_eq!(config.storage.path, "data/objects");
        assert_eq!(config.storage.public_base_url, "http://localhost:8080");
        assert!(config.storage.signing_secret.is_empty());

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/caixa.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[web]
host = "127.0.0.1"
port = 3000
cors_origins = ["http://localhost:3000", "http://localhost:5173"]
serve_static = false
static_path = "public"

[auth]
jwt_secret = "idp-secret"
session_cookie = "sid"
auto_provision_users = true

[database]
path = "custom/db.sqlite"

[storage]
path = "custom/objects"
public_base_url = "https://files.example.com"
signing_secret = "link-secret"

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.web.port, 3000);
        assert_eq!(config.web.cors_origins.len(), 2);
        assert_eq!(config.web.cors_origins[1], "http://localhost:5173");
        assert!(!config.web.serve_static);
        assert_eq!(config.web.static_path, "public");

        assert_eq!(config.auth.jwt_secret, "idp-secret");
        assert_eq!(config.auth.session_cookie, "sid");
        assert!(config.auth.auto_provision_users);

        assert_eq!(config.database.path, "custom/db.sqlite");

        assert_eq!(config.storage.path, "custom/objects");
        assert_eq!(config.storage.public_base_url, "https://files.example.com");
        assert_eq!(config.storage.signing_secret, "link-secret");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[web]
port = 9000
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.database.path, "data/caixa.db");
        assert_eq!(config.auth.session_cookie, "caixa_session");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        if let Err(CaixaError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(CaixaError::Io(_))));
    }

    #[test]
    fn test_apply_env_overrides() {
        let original = std::env::var("CAIXA_STORAGE_SIGNING_SECRET").ok();

        std::env::set_var("CAIXA_STORAGE_SIGNING_SECRET", "env-link-secret");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.storage.signing_secret, "env-link-secret");

        std::env::set_var("CAIXA_STORAGE_SIGNING_SECRET", "");
        let mut config = Config::default();
        config.storage.signing_secret = "original".to_string();
        config.apply_env_overrides();
        assert_eq!(config.storage.signing_secret, "original");

        if let Some(val) = original {
            std::env::set_var("CAIXA_STORAGE_SIGNING_SECRET", val);
        } else {
            std::env::remove_var("CAIXA_STORAGE_SIGNING_SECRET");
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_jwt_secret() {
        let mut config = valid_config();
        config.auth.jwt_secret = String::new();

        match config.validate() {
            Err(CaixaError::Config(msg)) => assert!(msg.contains("jwt_secret")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_missing_signing_secret() {
        let mut config = valid_config();
        config.storage.signing_secret = String::new();

        match config.validate() {
            Err(CaixaError::Config(msg)) => assert!(msg.contains("signing_secret")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_bad_base_url() {
        let mut config = valid_config();
        config.storage.public_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
