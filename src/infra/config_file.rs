// ============================================================
// Layer 6 — Hyperparameter Files
// ============================================================
// `train --config <file>` reads the gradient constants from a
// JSON document instead of the command line:
//
//   { "learning_rate": 0.01, "momentum": 0.5, "decay": 0.0002 }
//
// Missing fields keep their defaults (η = 0.02, momentum 0.9,
// decay 0).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::policy::Hyperparameters;

/// Read hyperparameters from a JSON file.
pub fn load_hyperparameters(path: &Path) -> Result<Hyperparameters> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

    let hyper: Hyperparameters = serde_json::from_str(&json)
        .with_context(|| format!("Invalid hyperparameters in '{}'", path.display()))?;

    tracing::debug!("Loaded {:?} from '{}'", hyper, path.display());
    Ok(hyper)
}
