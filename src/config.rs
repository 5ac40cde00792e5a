//! Application configuration loaded from environment variables.

use std::env;

use secrecy::{ExposeSecret, SecretString};

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 3000;
    pub const DEV_PG_HOST: &str = "localhost";
    pub const DEV_PG_PORT: u16 = 5432;
    pub const DEV_PG_USER: &str = "postgres";
    pub const DEV_PG_PASSWORD: &str = "postgres";
    pub const DEV_PG_DATABASE: &str = "sheet_store";
    pub const DEV_MAX_CONNECTIONS: u32 = 10;
    pub const DEV_MIN_CONNECTIONS: u32 = 1;
    pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10 MiB per spreadsheet
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// PostgreSQL connection settings.
///
/// Either a full connection string (`DATABASE_URL`) or the individual
/// libpq-style parts (`PGHOST`, `PGPORT`, `PGUSER`, `PGPASSWORD`, `PGDATABASE`).
/// The connection string wins when both are present.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<SecretString>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseSettings {
    /// Resolve the connection string handed to the pool.
    pub fn connection_url(&self) -> SecretString {
        if let Some(ref url) = self.url {
            return url.clone();
        }

        SecretString::from(format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(self.password.expose_secret()),
            self.host,
            self.port,
            urlencoding::encode(&self.name),
        ))
    }

    fn uses_dev_defaults(&self) -> bool {
        self.url.is_none()
            && self.user == defaults::DEV_PG_USER
            && self.password.expose_secret() == defaults::DEV_PG_PASSWORD
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database connection settings
    pub database: DatabaseSettings,
    /// Maximum accepted spreadsheet size in bytes
    pub max_upload_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production, default: development)
    /// - `HOST`: Server host (default: 127.0.0.1)
    /// - `PORT`: Server port (default: 3000)
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `PGHOST`, `PGPORT`, `PGUSER`, `PGPASSWORD`, `PGDATABASE`: connection parts,
    ///   used when `DATABASE_URL` is unset
    /// - `DB_MAX_CONNECTIONS`: Pool upper bound (default: 10)
    /// - `DB_MIN_CONNECTIONS`: Pool lower bound (default: 1)
    ///
    /// In production the server will not start with the development database
    /// credentials.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("RUST_ENV") {
            Ok(value) => Environment::parse(&value).ok_or(ConfigError::InvalidValue(
                "RUST_ENV must be 'development' or 'production'",
            ))?,
            Err(_) => Environment::Development,
        };

        let host = env::var("HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = parse_var("PORT", defaults::DEV_PORT, "PORT must be a valid port number")?;

        let database = DatabaseSettings {
            url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .map(SecretString::from),
            host: env::var("PGHOST").unwrap_or_else(|_| defaults::DEV_PG_HOST.to_string()),
            port: parse_var(
                "PGPORT",
                defaults::DEV_PG_PORT,
                "PGPORT must be a valid port number",
            )?,
            user: env::var("PGUSER").unwrap_or_else(|_| defaults::DEV_PG_USER.to_string()),
            password: SecretString::from(
                env::var("PGPASSWORD").unwrap_or_else(|_| defaults::DEV_PG_PASSWORD.to_string()),
            ),
            name: env::var("PGDATABASE").unwrap_or_else(|_| defaults::DEV_PG_DATABASE.to_string()),
            max_connections: parse_var(
                "DB_MAX_CONNECTIONS",
                defaults::DEV_MAX_CONNECTIONS,
                "DB_MAX_CONNECTIONS must be a valid number",
            )?,
            min_connections: parse_var(
                "DB_MIN_CONNECTIONS",
                defaults::DEV_MIN_CONNECTIONS,
                "DB_MIN_CONNECTIONS must be a valid number",
            )?,
        };

        let config = Config {
            environment,
            host,
            port,
            database,
            max_upload_size: defaults::MAX_UPLOAD_SIZE,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.uses_dev_defaults() {
            errors.push(
                "Database credentials are using development defaults. Set DATABASE_URL or PGUSER/PGPASSWORD."
                    .to_string(),
            );
        }

        if self.database.min_connections > self.database.max_connections {
            errors.push(format!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                self.database.min_connections, self.database.max_connections
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &str,
    default: T,
    message: &'static str,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(message)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
