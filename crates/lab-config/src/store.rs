//! Attempt store configuration.

use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    ".labrun/labrun.db".into()
}

fn default_trail_dir() -> String {
    ".labrun/trail".into()
}

const fn default_trail_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// libSQL database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Directory for per-attempt JSONL trail files.
    #[serde(default = "default_trail_dir")]
    pub trail_dir: String,

    /// Whether mutations are also appended to the JSONL trail.
    #[serde(default = "default_trail_enabled")]
    pub trail_enabled: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            trail_dir: default_trail_dir(),
            trail_enabled: default_trail_enabled(),
        }
    }
}

impl StoreConfig {
    /// Whether the database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.db_path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_into_dot_labrun() {
        let config = StoreConfig::default();
        assert_eq!(config.db_path, ".labrun/labrun.db");
        assert_eq!(config.trail_dir, ".labrun/trail");
        assert!(config.trail_enabled);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn memory_detection() {
        let config = StoreConfig {
            db_path: ":memory:".into(),
            ..Default::default()
        };
        assert!(config.is_in_memory());
    }
}
