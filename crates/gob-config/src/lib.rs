//! # gob-config
//!
//! Layered configuration loading for the Gobyoall dashboard using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GOB_*` prefix, `__` as separator)
//! 2. Project-level `./gobyoall.toml`
//! 3. User-level `~/.config/gobyoall/dashboard.toml`
//! 4. Built-in defaults
//!
//! Figment maps `GOB_API__BASE_URL` -> `api.base_url`,
//! `GOB_PERSISTENCE__DEBOUNCE_WAIT_MS` -> `persistence.debounce_wait_ms`, etc.
//!
//! ```no_run
//! use gob_config::DashboardConfig;
//!
//! let config = DashboardConfig::load_with_dotenv().expect("config");
//! println!("API: {}", config.api.base_url);
//! ```

mod api;
mod error;
mod persistence;
mod realtime;
mod validation;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use persistence::PersistenceConfig;
pub use realtime::RealtimeConfig;
pub use validation::ValidationConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

impl DashboardConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load configuration with an explicit TOML file layered above the
    /// project file and below the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_with(Some(path)).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    pub fn figment() -> Figment {
        Self::figment_with(None)
    }

    fn figment_with(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from("gobyoall.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit --config file
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("GOB_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gobyoall").join("dashboard.toml"))
    }

    /// Reject values that would make the stores misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.persistence.debounce_wait_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "persistence.debounce_wait_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.persistence.debounce_max_wait_ms < self.persistence.debounce_wait_ms {
            return Err(ConfigError::InvalidValue {
                field: "persistence.debounce_max_wait_ms".into(),
                reason: format!(
                    "must be at least debounce_wait_ms ({})",
                    self.persistence.debounce_wait_ms
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.realtime.refresh_on_reconnect);
        assert_eq!(config.validation.debounce_ms, 250);
    }

    #[test]
    fn max_wait_below_wait_is_rejected() {
        let mut config = DashboardConfig::default();
        config.persistence.debounce_max_wait_ms = 100;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("persistence.debounce_max_wait_ms"));
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let mut config = DashboardConfig::default();
        config.api.base_url = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "api.base_url"
        ));
    }
}
