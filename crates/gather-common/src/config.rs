//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults

use serde::Deserialize;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Get the global application configuration.
///
/// # Panics
/// Panics if config has not been initialized via [`init`].
pub fn get() -> &'static AppConfig {
    CONFIG.get().expect("Config not initialized. Call gather_common::config::init() first.")
}

/// Initialize the global configuration from environment.
///
/// Should be called once at application startup, before any other code accesses config.
pub fn init() -> Result<&'static AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let cfg = config::Config::builder()
        // Defaults
        .set_default("membership.cache_ttl_secs", 30)?
        .set_default("join_requests.cooldown_hours", 24)?
        // Optional config file
        .add_source(config::File::with_name("config").required(false))
        // Environment variables (GATHER_MEMBERSHIP__CACHE_TTL_SECS, etc.)
        .add_source(
            config::Environment::with_prefix("GATHER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = cfg.try_deserialize()?;
    Ok(CONFIG.get_or_init(|| app_config))
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub membership: MembershipSettings,
    #[serde(default)]
    pub join_requests: JoinRequestSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MembershipSettings {
    /// How long a membership lookup stays cached before it is re-checked
    /// against storage.
    pub cache_ttl_secs: u64,
}

impl Default for MembershipSettings {
    fn default() -> Self {
        Self { cache_ttl_secs: 30 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JoinRequestSettings {
    /// How long a user must wait after a rejection before submitting another
    /// join request for the same community.
    pub cooldown_hours: i64,
}

impl Default for JoinRequestSettings {
    fn default() -> Self {
        Self { cooldown_hours: 24 }
    }
}
