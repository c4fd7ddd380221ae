//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use social_presence::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Push queue holds {} frames", settings.presence.outbound_buffer);
//! ```

mod settings;

pub use settings::*;
