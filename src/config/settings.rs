//! Application settings and configuration structures.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// JWT authentication settings
    pub jwt: JwtSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Presence registry and fan-out tuning
    pub presence: PresenceSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply bundled migrations at startup
    pub run_migrations: bool,
}

/// JWT authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key the auth service signs tokens with
    pub secret: String,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Presence and fan-out configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceSettings {
    /// Frames buffered per connection before pushes are dropped as `Full`
    pub outbound_buffer: usize,

    /// Upper bound on a single socket write, in milliseconds
    pub write_timeout_ms: u64,

    /// Evict a session as soon as a push finds its connection closed
    pub evict_on_closed: bool,

    /// Room cache lifetime in seconds; 0 keeps rooms until invalidated
    pub room_cache_ttl_secs: u64,

    /// Report negative unread counts as zero
    pub clamp_negative_unread: bool,
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            outbound_buffer: 64,
            write_timeout_ms: 5000,
            evict_on_closed: true,
            room_cache_ttl_secs: 0,
            clamp_negative_unread: true,
        }
    }
}

impl PresenceSettings {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// `None` when rooms never expire.
    pub fn room_cache_ttl(&self) -> Option<Duration> {
        match self.room_cache_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Minimum required length for JWT secret
pub const MIN_JWT_SECRET_LENGTH: usize = 16;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if JWT secret is too short.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());
        let presence = PresenceSettings::default();

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", false)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("presence.outbound_buffer", presence.outbound_buffer as i64)?
            .set_default("presence.write_timeout_ms", presence.write_timeout_ms as i64)?
            .set_default("presence.evict_on_closed", presence.evict_on_closed)?
            .set_default("presence.room_cache_ttl_secs", presence.room_cache_ttl_secs as i64)?
            .set_default("presence.clamp_negative_unread", presence.clamp_negative_unread)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__PRESENCE__OUTBOUND_BUFFER=128 -> presence.outbound_buffer = 128
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validate())
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "JWT secret must be at least {} characters. Current length: {}",
                MIN_JWT_SECRET_LENGTH,
                self.jwt.secret.len()
            )));
        }
        if self.presence.outbound_buffer == 0 {
            return Err(ConfigError::Message(
                "presence.outbound_buffer must be greater than zero".into(),
            ));
        }
        Ok(self)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
