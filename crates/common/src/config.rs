//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Bootstrap administrator account.
    #[serde(default)]
    pub admin: Option<AdminSeedConfig>,
    /// Lost-and-found settings.
    #[serde(default)]
    pub lost_found: LostFoundConfig,
    /// Personal timetable grid settings.
    #[serde(default)]
    pub timetable: TimetableConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Whether self-service student registration is open.
    #[serde(default = "default_true")]
    pub allow_registration: bool,
}

/// Administrator account created at start-up when missing.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeedConfig {
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Display name.
    #[serde(default = "default_admin_name")]
    pub name: String,
}

/// Lost-and-found configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LostFoundConfig {
    /// Days after creation before an unclaimed item expires.
    #[serde(default = "default_expiry_days")]
    pub expiry_days: i64,
}

/// Weekly grid geometry for personal timetables.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimetableConfig {
    /// Hour the grid starts at.
    #[serde(default = "default_base_hour")]
    pub base_hour: u32,
    /// Vertical pixels per hour.
    #[serde(default = "default_pixels_per_hour")]
    pub pixels_per_hour: u32,
    /// Minimum block height in pixels.
    #[serde(default = "default_min_height")]
    pub min_height: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
        }
    }
}

impl Default for LostFoundConfig {
    fn default() -> Self {
        Self {
            expiry_days: default_expiry_days(),
        }
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            base_hour: default_base_hour(),
            pixels_per_hour: default_pixels_per_hour(),
            min_height: default_min_height(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_true() -> bool {
    true
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

const fn default_expiry_days() -> i64 {
    30
}

const fn default_base_hour() -> u32 {
    8
}

const fn default_pixels_per_hour() -> u32 {
    60
}

const fn default_min_height() -> u32 {
    60
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, exported into the process environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `CAMPUS_ENV`)
    /// 4. Environment variables with `CAMPUS__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("CAMPUS_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CAMPUS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("CAMPUS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
