// ============================================================
// Layer 2 — InitUseCase
// ============================================================
// Creates a model file of the requested dimensions, or with
// `resize` set, grows/shrinks an existing one:
//
//   create: header-only file → resize to nvis × nhid
//   resize: open read-write  → resize to nvis × nhid
//
// Either way the file is flushed and closed before returning.
// The visible unit kind is fixed when the file is created;
// a resize keeps whatever the file says.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::policy::VisibleUnits;
use crate::infra::model_store::{ModelStore, OpenMode};
use crate::ml::sampler::RngSampler;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    pub model_path: PathBuf,
    pub nvis:       usize,
    pub nhid:       usize,
    /// Visible unit kind of a new file; `None` → replicated softmax
    pub visible:    Option<VisibleUnits>,
    /// Resize an existing file instead of creating a new one
    pub resize:     bool,
    /// Seed for the initial parameter draws
    pub seed:       Option<u64>,
}

pub struct InitUseCase {
    config: InitConfig,
}

impl InitUseCase {
    pub fn new(config: InitConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        let path = &cfg.model_path;
        let mut sampler = RngSampler::from_seed_option(cfg.seed);

        let store = if cfg.resize {
            let mut store = ModelStore::open(path, OpenMode::ReadWrite)
                .with_context(|| format!("Failed to load model '{}'", path.display()))?;

            if let Some(visible) = cfg.visible.filter(|&v| v != store.units()) {
                tracing::warn!(
                    "Ignoring visible units {:?}: '{}' was created with {:?}",
                    visible,
                    path.display(),
                    store.units()
                );
            }

            store
                .resize(cfg.nvis, cfg.nhid, &mut sampler)
                .with_context(|| format!("Failed to resize model '{}'", path.display()))?;
            store
        } else {
            let units = cfg.visible.unwrap_or_default();
            tracing::info!(
                "Creating {}x{} model '{}' ({:?} visible units)",
                cfg.nvis,
                cfg.nhid,
                path.display(),
                units
            );
            ModelStore::create_with_dimensions(path, units, cfg.nvis, cfg.nhid, &mut sampler)
                .with_context(|| format!("Failed to create model '{}'", path.display()))?
        };

        store.close()?;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn config(path: PathBuf, nvis: usize, nhid: usize, resize: bool) -> InitConfig {
        InitConfig { model_path: path, nvis, nhid, visible: None, resize, seed: Some(42) }
    }

    #[test]
    fn test_create_then_resize() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.rbm");

        InitUseCase::new(InitConfig {
            visible: Some(VisibleUnits::Binary),
            ..config(path.clone(), 4, 2, false)
        })
        .execute()
        .unwrap();
        let vbias = ModelStore::open(&path, OpenMode::ReadOnly).unwrap().vbias().to_vec();

        InitUseCase::new(config(path.clone(), 6, 2, true)).execute().unwrap();

        let store = ModelStore::open(&path, OpenMode::ReadOnly).unwrap();
        assert_eq!((store.nvis(), store.nhid()), (6, 2));
        assert_eq!(store.units(), VisibleUnits::Binary);
        assert_eq!(&store.vbias()[..4], &vbias[..]);
    }

    #[test]
    fn test_resize_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = InitUseCase::new(config(dir.path().join("nope.rbm"), 4, 2, true)).execute();
        assert!(result.is_err());
    }
}
