//! Configuration module
//!
//! Settings come from a TOML file (default: `<config dir>/job-board/config.toml`,
//! overridable via `JOBBOARD_CONFIG`). Secrets are taken from the
//! environment (`JWT_SECRET`, `DATABASE_PASSWORD`) and override the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Database connection settings.
///
/// `driver` selects the backend ("postgres" or "mysql"); everything else
/// feeds into the connection URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub dbname: String,
    pub options: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            driver: "postgres".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            username: "jobboard".to_string(),
            password: String::new(),
            dbname: "jobboard".to_string(),
            options: String::new(),
        }
    }
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        let options = if self.options.is_empty() {
            String::new()
        } else {
            format!("?{}", self.options)
        };

        format!(
            "{}://{}:{}@{}:{}/{}{}",
            self.driver, self.username, self.password, self.host, self.port, self.dbname, options
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Symmetric JWT signing secret; empty means unset and fails startup.
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Issuer claim stamped into every token
    pub issuer: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: 3,
            bcrypt_cost: 12,
            issuer: "job-board".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Ok(password) = std::env::var("DATABASE_PASSWORD") {
            self.database.password = password;
        }
    }
}

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("job-board/config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.token_ttl_hours, 3);
        assert_eq!(config.security.bcrypt_cost, 12);
        assert!(config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [database]
            driver = "mysql"
            port = 3306

            [security]
            token_ttl_hours = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.driver, "mysql");
        assert_eq!(config.security.token_ttl_hours, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_connection_url() {
        let settings = DatabaseSettings {
            driver: "mysql".to_string(),
            host: "db".to_string(),
            port: 3306,
            username: "user".to_string(),
            password: "pwd".to_string(),
            dbname: "jobs".to_string(),
            options: "ssl-mode=DISABLED".to_string(),
        };

        assert_eq!(
            settings.connection_url(),
            "mysql://user:pwd@db:3306/jobs?ssl-mode=DISABLED"
        );

        let defaults = DatabaseSettings::default();
        assert_eq!(
            defaults.connection_url(),
            "postgres://jobboard:@localhost:5432/jobboard"
        );
    }
}
