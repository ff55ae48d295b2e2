use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use gob_config::DashboardConfig;
use gob_store::{AppContext, FileStorage, MemoryStorage, PersistenceAdapter, SystemClock};

use crate::cli::GlobalFlags;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<DashboardConfig> {
    match &flags.config {
        Some(path) => DashboardConfig::load_from(Path::new(path))
            .with_context(|| format!("failed to load config from {path}")),
        None => DashboardConfig::load_with_dotenv().context("failed to load dashboard config"),
    }
}

/// Build the stores on top of file storage in the configured directory, or
/// in memory when persistence is disabled or no data directory exists.
pub fn open(config: &DashboardConfig) -> anyhow::Result<AppContext> {
    let adapter: Rc<dyn PersistenceAdapter> = match config.persistence.storage_dir() {
        Some(dir) if config.persistence.enabled => {
            tracing::debug!(dir = %dir.display(), "using file storage");
            Rc::new(FileStorage::new(dir))
        }
        Some(_) => Rc::new(MemoryStorage::new()),
        None => {
            tracing::warn!("no data directory available; state will not be persisted");
            Rc::new(MemoryStorage::new())
        }
    };
    Ok(AppContext::new(config, adapter, Rc::new(SystemClock))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_persists_into_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DashboardConfig::default();
        config.persistence.dir = dir.path().display().to_string();

        let mut ctx = open(&config).unwrap();
        ctx.state.update(|s| s.tab = "stats".into());
        ctx.flush();

        assert!(dir.path().join("state.json").exists());
    }

    #[test]
    fn disabled_persistence_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DashboardConfig::default();
        config.persistence.dir = dir.path().display().to_string();
        config.persistence.enabled = false;

        let mut ctx = open(&config).unwrap();
        ctx.state.update(|s| s.tab = "stats".into());
        ctx.flush();

        assert!(!dir.path().join("state.json").exists());
    }
}
