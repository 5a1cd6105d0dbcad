use anyhow::Context;
use lab_config::LabConfig;

use crate::cli::GlobalFlags;

/// Load configuration, honoring an explicit `--config` file when given.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<LabConfig> {
    dotenvy::dotenv().ok();

    match &flags.config {
        Some(path) => LabConfig::load_from_file(path)
            .with_context(|| format!("failed to load config file '{path}'")),
        None => LabConfig::load().context("failed to load labrun config"),
    }
}
