// ============================================================
// Layer 2 — DreamUseCase
// ============================================================
// Lets the machine reconstruct each input document:
//
//   vo → ho → h sample → expected v → v sample
//
// and writes the sampled visible counts back out in the
// ingestion format ("<index>\t<count>" lines, then a form
// feed), so a dream can be fed into train or prop again.
// Every document gets its form feed, even an empty dream,
// which keeps input and output documents aligned.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::document_loop::{run_documents, LoopStats};
use crate::data::reader::TermFreqReader;
use crate::infra::interrupt::StopFlag;
use crate::infra::model_store::{ModelStore, OpenMode};
use crate::ml::sampler::RngSampler;
use crate::ml::trainer::{ContextConfig, TrainingContext};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamConfig {
    pub model_path: PathBuf,
    pub strict:     bool,
    pub seed:       Option<u64>,
}

pub struct DreamUseCase {
    config: DreamConfig,
}

impl DreamUseCase {
    pub fn new(config: DreamConfig) -> Self {
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
            let dream = ctx.dream_one(doc);
            for e in dream.entries() {
                writeln!(output, "{}\t{}", e.index, e.count)?;
            }
            writeln!(output, "\x0c")?;
            Ok(())
        });

        drop(ctx);
        reader.close();
        output.flush().context("Failed to flush output")?;
        store.close()?;

        let stats = outcome?;
        tracing::info!("Dreamt {} document(s)", stats.documents);
        Ok(stats)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::VisibleUnits;
    use std::io::Cursor;

    #[test]
    fn test_dream_output_reads_back_as_documents() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.rbm");
        let mut sampler = RngSampler::seeded(42);
        ModelStore::create_with_dimensions(&path, VisibleUnits::default(), 6, 3, &mut sampler)
            .unwrap()
            .close()
            .unwrap();

        let mut out = Vec::new();
        let stats = DreamUseCase::new(DreamConfig { model_path: path, strict: true, seed: Some(5) })
            .execute(Cursor::new(&b"0\t4\n3\t2\n\x0c\n5\t1\n\x0c\n"[..]), &mut out, &StopFlag::new())
            .unwrap();
        assert_eq!(stats.documents, 2);

        // Exactly one form feed per input document, all lines well formed
        let feeds = out.split(|&b| b == b'\n').filter(|l| l.first() == Some(&b'\x0c')).count();
        assert_eq!(feeds, 2);

        let mut reader = TermFreqReader::new(Cursor::new(out)).strict(true);
        let mut docs = 0;
        while let Some(doc) = reader.read_document().unwrap() {
            assert!(doc.entries().iter().all(|e| e.index < 6 && e.count > 0));
            docs += 1;
        }
        assert_eq!(docs, 2);
    }
}
