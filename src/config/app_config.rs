use serde::Deserialize;

use crate::infrastructure::storage::SqliteConfig;

/// Longest accepted session lifetime (ten years)
pub const MAX_TOKEN_TTL_HOURS: u64 = 24 * 366 * 10;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static` and holding the HTML pages
    pub static_dir: String,
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Signing secret; falls back to `JWT_SECRET`, then a random one
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: u64,
    pub cookie_name: String,
    /// Mark the session cookie `Secure` (HTTPS only)
    pub cookie_secure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "static".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://todos.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: 24,
            cookie_name: "token".to_string(),
            cookie_secure: false,
        }
    }
}

impl DatabaseConfig {
    pub fn to_sqlite_config(&self) -> SqliteConfig {
        SqliteConfig::new(&self.url)
            .with_max_connections(self.max_connections)
            .with_min_connections(self.min_connections)
            .with_acquire_timeout(self.acquire_timeout_secs)
            .with_idle_timeout(self.idle_timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that would make the server misbehave at runtime
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let ttl = self.auth.token_ttl_hours;

        if ttl == 0 || ttl > MAX_TOKEN_TTL_HOURS {
            return Err(config::ConfigError::Message(format!(
                "auth.token_ttl_hours must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS, ttl
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.database.url, "sqlite://todos.db");
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.auth.cookie_name, "token");
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 8081

                [logging]
                format = "json"

                [auth]
                jwt_secret = "s3cret"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_token_ttl_bounds() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.auth.token_ttl_hours = 0;
        assert!(config.validate().is_err());

        config.auth.token_ttl_hours = MAX_TOKEN_TTL_HOURS;
        assert!(config.validate().is_ok());

        config.auth.token_ttl_hours = u64::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("token_ttl_hours"));
    }

    #[test]
    fn test_sqlite_config_conversion() {
        let database = DatabaseConfig {
            url: "sqlite://other.db".to_string(),
            max_connections: 3,
            ..Default::default()
        };

        let sqlite = database.to_sqlite_config();
        assert_eq!(sqlite.url, "sqlite://other.db");
        assert_eq!(sqlite.max_connections, 3);
        assert_eq!(sqlite.idle_timeout_secs, 600);
    }
}
