use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use lab_config::LabConfig;
use lab_db::service::LabService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<LabService>,
    pub config: LabConfig,
}

impl AppContext {
    /// Open the configured store, creating its directories on first use.
    pub async fn init(config: LabConfig) -> anyhow::Result<Self> {
        let store = &config.store;

        if !store.is_in_memory()
            && let Some(parent) = Path::new(&store.db_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let trail_dir = store
            .trail_enabled
            .then(|| PathBuf::from(&store.trail_dir));

        let service = LabService::new_local(&store.db_path, trail_dir)
            .await
            .context("failed to initialize lab-db service")?;

        tracing::debug!(db_path = %store.db_path, trail = store.trail_enabled, "context: store ready");

        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }
}
