//! # lab-config
//!
//! Layered configuration loading for labrun using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LABRUN_*` prefix, `__` as separator)
//! 2. Project-level `.labrun/config.toml`
//! 3. User-level `~/.config/labrun/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LABRUN_ENGINE__TICK_INTERVAL_MS` -> `engine.tick_interval_ms`,
//! `LABRUN_STORE__DB_PATH` -> `store.db_path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use lab_config::LabConfig;
//!
//! let config = LabConfig::load_with_dotenv().expect("config");
//! println!("ticking every {} ms", config.engine.tick_interval_ms);
//! ```

mod engine;
mod error;
mod general;
mod store;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LabConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl LabConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration from an explicit TOML file layered over defaults,
    /// with environment variables still taking precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFile` if `path` does not exist, otherwise
    /// the same errors as [`Self::load`].
    pub fn load_from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.is_file() {
            return Err(ConfigError::MissingFile { path });
        }
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("LABRUN_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".labrun/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("LABRUN_").split("__"));

        figment
    }

    /// Check cross-field and range constraints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.general.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("labrun").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory. Silently does nothing if
    /// no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LabConfig::default();
        config.validate().unwrap();
        assert_eq!(config.engine.tick_interval_ms, 1000);
        assert_eq!(config.general.default_limit, 20);
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = LabConfig::figment();
        let config: LabConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.engine.default_passing_score, 70);
    }

    #[test]
    fn zero_default_limit_is_invalid() {
        let mut config = LabConfig::default();
        config.general.default_limit = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
