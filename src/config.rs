//! Server configuration from environment variables

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// JSON catalog file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Postgres URL for submitted bookings; submissions are only logged when unset
    pub database_url: Option<String>,
    /// Maximum lifetime of a booking session
    pub session_ttl: Duration,
    /// Idle time after which a booking session is dropped
    pub session_idle: Duration,
    /// Session cache capacity
    pub max_sessions: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            catalog_path: None,
            database_url: None,
            session_ttl: Duration::from_secs(120 * 60),
            session_idle: Duration::from_secs(30 * 60),
            max_sessions: 10_000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse(&var, "PORT")?.unwrap_or(defaults.port),
            catalog_path: var("CATALOG_PATH").map(PathBuf::from),
            database_url: var("DATABASE_URL"),
            session_ttl: parse(&var, "SESSION_TTL_MINUTES")?
                .map(minutes)
                .unwrap_or(defaults.session_ttl),
            session_idle: parse(&var, "SESSION_IDLE_MINUTES")?
                .map(minutes)
                .unwrap_or(defaults.session_idle),
            max_sessions: parse(&var, "MAX_SESSIONS")?.unwrap_or(defaults.max_sessions),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

fn parse<T: FromStr>(
    var: &impl Fn(&'static str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}
