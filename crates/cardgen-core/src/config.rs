//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! generation constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Largest number of records one request may produce.
pub const MAX_BATCH_SIZE: usize = 50;
/// Records shown in a chat preview before the rest is summarized.
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;
/// Earliest year drawn when the expiry year is not supplied.
pub const EXPIRY_YEAR_MIN: u16 = 2025;
/// Latest year drawn when the expiry year is not supplied.
pub const EXPIRY_YEAR_MAX: u16 = 2032;

/// Build the layered configuration used by every crate in the workspace.
///
/// Sources, lowest priority first: `config/default`, `config/{RUN_MODE}`,
/// `config/local`, `APP__`-prefixed environment, plain environment.
///
/// # Errors
///
/// Returns a `ConfigError` if a present source cannot be read.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        // UPPER_SNAKE_CASE maps to snake_case; empty values count as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

/// Generation settings shared by all transports.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CardGenSettings {
    /// How many records a chat preview lists
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
    /// Optional upper bound on cached conversations (unbounded when unset)
    #[serde(default)]
    pub session_cache_capacity: Option<u64>,
}

const fn default_preview_limit() -> usize {
    DEFAULT_PREVIEW_LIMIT
}

impl Default for CardGenSettings {
    fn default() -> Self {
        Self {
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            session_cache_capacity: None,
        }
    }
}

impl CardGenSettings {
    /// Load settings from config files and environment.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cardgen_core::config::CardGenSettings;
    ///
    /// let settings = CardGenSettings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        let mut settings: Self = build_config()?.try_deserialize()?;
        // A zero limit would hide every record
        if settings.preview_limit == 0 {
            settings.preview_limit = DEFAULT_PREVIEW_LIMIT;
        }
        Ok(settings)
    }
}
