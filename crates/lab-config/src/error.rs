//! Errors raised while loading or validating `LabConfig`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be parsed or a value has the wrong type.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// A value parsed but is out of range.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
