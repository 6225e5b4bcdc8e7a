// ============================================================
// Layer 2 — InfoUseCase
// ============================================================
// One overview line per model file:
//
//   <file>\t<nvis>x<nhid>\t<visible distribution>->binary
//
// A file that cannot be read is logged and skipped; the
// others are still listed, and the use case fails at the end.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::infra::model_store::{ModelStore, OpenMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoConfig {
    pub model_paths: Vec<PathBuf>,
}

pub struct InfoUseCase {
    config: InfoConfig,
}

impl InfoUseCase {
    pub fn new(config: InfoConfig) -> Self {
        Self { config }
    }

    pub fn execute<W: Write>(&self, output: &mut W) -> Result<()> {
        let mut failed = 0usize;

        for path in &self.config.model_paths {
            let store = match ModelStore::open(path, OpenMode::ReadOnly) {
                Ok(store) => store,
                Err(e) => {
                    tracing::error!("Error opening model file: {e}");
                    failed += 1;
                    continue;
                }
            };

            writeln!(
                output,
                "{}\t{}x{}\t{}->binary",
                path.display(),
                store.nvis(),
                store.nhid(),
                store.units().distribution()
            )?;
            store.close()?;
        }
        output.flush().context("Failed to flush output")?;

        anyhow::ensure!(
            failed == 0,
            "{} of {} model file(s) could not be read",
            failed,
            self.config.model_paths.len()
        );
        Ok(())
    }
}
