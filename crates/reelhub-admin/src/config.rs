//! Environment-driven configuration
//!
//! Variables are read with the `REELHUB_` prefix, after loading `.env`:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `REELHUB_HOST` | `127.0.0.1` |
//! | `REELHUB_PORT` | `3000` |
//! | `REELHUB_ENV` | `development` |
//! | `REELHUB_LOG_LEVEL` | per environment |
//! | `REELHUB_LOG_FORMAT` | `compact` |
//! | `REELHUB_CSRF_MAX_AGE_SECS` | `86400` |
//! | `REELHUB_MAX_BODY_BYTES` | `1048576` |

use reelhub_core::DEFAULT_BODY_LIMIT;
use reelhub_csrf::CsrfConfig;
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Prefix shared by every configuration variable
pub const ENV_PREFIX: &str = "REELHUB_";

/// Error type for configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),
    /// Host and port do not form a socket address.
    #[error("Invalid listen address '{addr}': {source}")]
    InvalidAddr {
        /// The rejected `host:port`
        addr: String,
        /// Parse failure
        source: std::net::AddrParseError,
    },
}

/// Deployment profile, from `REELHUB_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Environment {
    /// Local development over plain HTTP
    #[default]
    Development,
    /// Served over HTTPS
    Production,
}

impl Environment {
    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Get the environment name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Get the default log level for this environment.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Production => "info",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogFormat {
    /// One line per event
    #[default]
    Compact,
    /// Multi-line, human friendly
    Pretty,
}

impl TryFrom<String> for LogFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Admin server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
    /// Deployment profile
    #[serde(default, rename = "env")]
    pub environment: Environment,
    /// `EnvFilter` directive; falls back to the environment's default level
    #[serde(default)]
    pub log_level: Option<String>,
    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,
    /// Lifetime of the CSRF cookie in seconds
    #[serde(default = "default_csrf_max_age")]
    pub csrf_max_age_secs: u64,
    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_csrf_max_age() -> u64 {
    60 * 60 * 24
}

fn default_max_body_bytes() -> usize {
    DEFAULT_BODY_LIMIT
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: None,
            log_format: LogFormat::default(),
            csrf_max_age_secs: default_csrf_max_age(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl AdminConfig {
    /// Load configuration from `REELHUB_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// Load configuration from explicit `(name, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?)
    }

    /// The listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|source| ConfigError::InvalidAddr { addr, source })
    }

    /// The effective log filter
    pub fn log_filter(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| self.environment.default_log_level())
    }

    /// CSRF settings derived from this configuration
    ///
    /// The cookie is `Secure` in production only.
    pub fn csrf(&self) -> CsrfConfig {
        CsrfConfig::new()
            .secure(self.environment.is_production())
            .max_age(Duration::from_secs(self.csrf_max_age_secs))
    }
}

/// Load `.env` from the working directory, if present.
///
/// Existing environment variables take precedence. A missing file is not an
/// error.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err),
    }
}
