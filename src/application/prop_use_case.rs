// ============================================================
// Layer 2 — PropUseCase
// ============================================================
// Maps every input document to its hidden representation and
// writes it out:
//
//   dense (default)   one activation probability per line,
//                     the line number is the hidden unit
//   sparse (--sample) "<index>\t<value>" per hidden unit that
//                     fired, then a lone form-feed line if any
//                     unit fired at all
//
// The model is mapped read-only.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::document_loop::{run_documents, LoopStats};
use crate::data::reader::TermFreqReader;
use crate::infra::interrupt::StopFlag;
use crate::infra::model_store::{ModelStore, OpenMode};
use crate::ml::sampler::RngSampler;
use crate::ml::trainer::{ContextConfig, Inference, TrainingContext};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropConfig {
    pub model_path: PathBuf,
    /// Emit a stochastic sample instead of the probabilities
    pub sample:     bool,
    pub strict:     bool,
    pub seed:       Option<u64>,
}

pub struct PropUseCase {
    config: PropConfig,
}

impl PropUseCase {
    pub fn new(config: PropConfig) -> Self {
        Self { config }
    }

    pub fn execute<R: BufRead, W: Write>(
        &self,
        input:  R,
        output: &mut W,
        stop:   &StopFlag,
    ) -> Result<LoopStats> {
        let cfg = &self.config;

        let mut store = ModelStore::open(&cfg.model_path, OpenMode::ReadOnly)
            .with_context(|| format!("Failed to open model '{}'", cfg.model_path.display()))?;
        let mut reader = TermFreqReader::new(input).strict(cfg.strict);
        let mut ctx = TrainingContext::new(
            &mut store,
            RngSampler::from_seed_option(cfg.seed),
            ContextConfig::default(),
        );

        let outcome = run_documents(&mut reader, stop, |doc| {
            match ctx.infer_one(doc, cfg.sample) {
                Inference::Dense(probs) => {
                    for p in probs {
                        writeln!(output, "{}", p)?;
                    }
                }
                Inference::Sparse(fired) => {
                    for e in fired.entries() {
                        writeln!(output, "{}\t{}", e.index, e.count)?;
                    }
                    if !fired.is_empty() {
                        writeln!(output, "\x0c")?;
                    }
                }
            }
            Ok(())
        });

        drop(ctx);
        reader.close();
        output.flush().context("Failed to flush output")?;
        store.close()?;

        let stats = outcome?;
        tracing::info!("Propagated {} document(s)", stats.documents);
        Ok(stats)
    }
}
