//! Configuration management for Review Desk
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with RD__ prefix and `__` between
//!    key segments (e.g. RD__SUPABASE__URL, RD__SESSION__REFRESH_LEEWAY_SECS)
//!
//! `RD_ENVIRONMENT` picks the configuration file.

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Hosted backend (auth + REST) configuration
    pub supabase: SupabaseConfig,

    /// Where businesses are created
    pub store: StoreConfig,

    /// Session cookie handling
    pub session: SessionConfig,

    /// Log output
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. https://xyzcompany.supabase.co
    pub url: String,

    /// Public anon key sent as the `apikey` header
    pub anon_key: String,

    /// Timeout for every call to the hosted backend
    pub request_timeout_secs: u64,
}

/// Backend used to run the `create_business` procedure
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreDriver {
    /// Remote procedure call through the REST gateway
    #[default]
    Rest,
    /// Direct Postgres connection
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub driver: StoreDriver,

    /// PostgreSQL connection URL, required by the postgres driver
    pub database_url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Cookie holding the access token
    pub access_cookie: String,

    /// Cookie holding the refresh token
    pub refresh_cookie: String,

    /// Mark session cookies `Secure`
    pub secure: bool,

    /// Refresh access tokens expiring within this many seconds
    pub refresh_leeway_secs: i64,

    /// Path prefixes the session middleware leaves alone
    pub excluded_prefixes: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("RD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("supabase.url", "http://localhost:54321")?
            .set_default("supabase.request_timeout_secs", 10)?
            .set_default("store.driver", "rest")?
            .set_default("store.max_connections", 10)?
            .set_default("store.min_connections", 1)?
            .set_default("session.access_cookie", DEFAULT_ACCESS_COOKIE)?
            .set_default("session.refresh_cookie", DEFAULT_REFRESH_COOKIE)?
            .set_default("session.secure", environment == "production")?
            .set_default("session.refresh_leeway_secs", 60)?
            .set_default("session.excluded_prefixes", DEFAULT_EXCLUDED_PREFIXES.to_vec())?
            .set_default("log.json", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (RD__SUPABASE__URL etc.)
            .add_source(
                Environment::with_prefix("RD")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("session.excluded_prefixes")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

pub const DEFAULT_ACCESS_COOKIE: &str = "sb-access-token";
pub const DEFAULT_REFRESH_COOKIE: &str = "sb-refresh-token";

/// Static build assets and the favicon
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] =
    &["/_next/static", "/_next/image", "/static/", "/favicon.ico"];

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            driver: StoreDriver::Rest,
            database_url: None,
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_cookie: DEFAULT_ACCESS_COOKIE.to_string(),
            refresh_cookie: DEFAULT_REFRESH_COOKIE.to_string(),
            secure: false,
            refresh_leeway_secs: 60,
            excluded_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl SessionConfig {
    /// Whether the middleware should skip this path
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}
