// ============================================================
// Layer 2 — CheckUseCase
// ============================================================
// Opens a model read-only, scans it for NaN/Inf parameters and
// prints one line per offending coordinate. The report is
// returned; deciding the exit status is left to the CLI.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::infra::integrity::{self, IntegrityReport};
use crate::infra::model_store::{ModelStore, OpenMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub model_path: PathBuf,
}

pub struct CheckUseCase {
    config: CheckConfig,
}

impl CheckUseCase {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn execute<W: Write>(&self, output: &mut W) -> Result<IntegrityReport> {
        let path = &self.config.model_path;
        let store = ModelStore::open(path, OpenMode::ReadOnly)
            .with_context(|| format!("Failed to open model '{}'", path.display()))?;

        let report = integrity::check(&store.view());
        for issue in &report.issues {
            tracing::error!("Non-finite parameter in '{}': {}", path.display(), issue);
            writeln!(output, "{}", issue)?;
        }
        output.flush().context("Failed to flush output")?;
        store.close()?;

        if report.is_ok() {
            tracing::info!("Model '{}' passed the integrity check", path.display());
        }
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::VisibleUnits;
    use crate::ml::sampler::RngSampler;

    #[test]
    fn test_reports_poisoned_parameters() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.rbm");
        let mut sampler = RngSampler::seeded(42);
        let mut store =
            ModelStore::create_with_dimensions(&path, VisibleUnits::default(), 3, 2, &mut sampler)
                .unwrap();

        let check = CheckUseCase::new(CheckConfig { model_path: path.clone() });
        let mut out = Vec::new();
        store.flush().unwrap();
        assert!(check.execute(&mut out).unwrap().is_ok());
        assert!(out.is_empty());

        {
            let params = store.params_mut().unwrap();
            params.hbias[1] = f32::NAN;
            params.weights[4] = f32::NAN; // W[2,0]
        }
        store.close().unwrap();

        let report = check.execute(&mut out).unwrap();
        assert_eq!(report.issues.len(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "HBIAS[1] <- NAN\nW[2,0] <- NAN\n");
    }
}
