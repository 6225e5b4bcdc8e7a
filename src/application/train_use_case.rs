// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs a CD-1 training session over a term-frequency stream:
//
//   Step 1: Open the model read-write            (Layer 6)
//   Step 2: Wrap the input in a TermFreqReader   (Layer 4)
//   Step 3: Train document by document           (Layer 5)
//           commit + reset every `batch_size`
//   Step 4: Commit the partial batch, once
//   Step 5: Close the stream, flush and close the model
//
// Step 4 and 5 also run when the session ends early, be it
// through Ctrl-C or a read error; the error is reported after
// the model is safely closed.
//
// Reference: Hinton (2010) A Practical Guide to Training RBMs

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::document_loop::{run_documents, LoopEnd};
use crate::data::reader::TermFreqReader;
use crate::domain::policy::{Hyperparameters, UpdatePolicy};
use crate::infra::interrupt::StopFlag;
use crate::infra::model_store::{ModelStore, OpenMode};
use crate::ml::sampler::RngSampler;
use crate::ml::trainer::{ContextConfig, TrainingContext};

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub model_path: PathBuf,
    /// Documents per deferred commit
    pub batch_size: usize,
    pub update:     UpdatePolicy,
    pub hyper:      Hyperparameters,
    /// Fail on malformed input lines instead of skipping them
    pub strict:     bool,
    pub seed:       Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("machine.rbm"),
            batch_size: 1,
            update:     UpdatePolicy::Deferred,
            hyper:      Hyperparameters::default(),
            strict:     false,
            seed:       None,
        }
    }
}

/// What a training session did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainSummary {
    pub documents:   usize,
    pub skipped:     usize,
    pub batches:     usize,
    pub interrupted: bool,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute<R: BufRead>(&self, input: R, stop: &StopFlag) -> Result<TrainSummary> {
        let cfg = &self.config;
        anyhow::ensure!(cfg.batch_size > 0, "Batch size must be at least 1");

        // ── Step 1: Model ─────────────────────────────────────────────────────
        let mut store = ModelStore::open(&cfg.model_path, OpenMode::ReadWrite)
            .with_context(|| format!("Failed to open model '{}'", cfg.model_path.display()))?;
        tracing::info!(
            "Training {}x{} model '{}' (batch size {}, {:?} updates)",
            store.nvis(),
            store.nhid(),
            cfg.model_path.display(),
            cfg.batch_size,
            cfg.update
        );

        // ── Step 2: Input ─────────────────────────────────────────────────────
        let mut reader = TermFreqReader::new(input).strict(cfg.strict);

        // ── Step 3: Batches ───────────────────────────────────────────────────
        let mut summary = TrainSummary::default();
        let mut ctx = TrainingContext::new(
            &mut store,
            RngSampler::from_seed_option(cfg.seed),
            ContextConfig { hyper: cfg.hyper, update: cfg.update },
        );

        let outcome = run_documents(&mut reader, stop, |doc| {
            ctx.train_one(doc)?;
            if ctx.pending() == cfg.batch_size {
                ctx.commit()?;
                ctx.reset();
                summary.batches += 1;
            }
            Ok(())
        });

        // ── Step 4: Partial batch ─────────────────────────────────────────────
        if ctx.pending() > 0 {
            summary.batches += 1;
        }
        ctx.commit()?;
        drop(ctx);

        // ── Step 5: Release ───────────────────────────────────────────────────
        reader.close();
        store.close()?;

        let stats = outcome?;
        summary.documents   = stats.documents;
        summary.skipped     = stats.skipped;
        summary.interrupted = stats.end == LoopEnd::Interrupted;

        tracing::info!(
            "Trained on {} document(s) in {} batch(es){}",
            summary.documents,
            summary.batches,
            if summary.interrupted { ", interrupted" } else { "" }
        );
        Ok(summary)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::VisibleUnits;
    use crate::infra::integrity;
    use std::io::{Cursor, Read};

    const CORPUS: &[u8] = b"0\t3\n2\t1\n\x0c\n1\t2\n3\t4\n\x0c\n\x0c\n0\t1\n3\t1\n\x0c\n";

    fn model(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("m.rbm");
        let mut sampler = RngSampler::seeded(42);
        ModelStore::create_with_dimensions(&path, VisibleUnits::default(), 4, 3, &mut sampler)
            .unwrap()
            .close()
            .unwrap();
        path
    }

    fn config(path: PathBuf, batch_size: usize) -> TrainConfig {
        TrainConfig { model_path: path, batch_size, seed: Some(42), ..Default::default() }
    }

    #[test]
    fn test_trains_and_counts_batches() {
        let dir  = tempfile::tempdir().unwrap();
        let path = model(&dir);
        let before = ModelStore::open(&path, OpenMode::ReadOnly).unwrap().weights().to_vec();

        let summary = TrainUseCase::new(config(path.clone(), 2))
            .execute(Cursor::new(CORPUS), &StopFlag::new())
            .unwrap();

        assert_eq!(
            summary,
            TrainSummary { documents: 3, skipped: 1, batches: 2, interrupted: false }
        );

        let store = ModelStore::open(&path, OpenMode::ReadOnly).unwrap();
        assert_ne!(store.weights(), &before[..]);
        assert!(integrity::check(&store.view()).is_ok());
    }

    #[test]
    fn test_raised_flag_still_closes_cleanly() {
        let dir  = tempfile::tempdir().unwrap();
        let path = model(&dir);
        let stop = StopFlag::new();
        stop.raise();

        let summary = TrainUseCase::new(config(path.clone(), 1))
            .execute(Cursor::new(CORPUS), &stop)
            .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.documents, 0);
        assert_eq!(summary.batches, 0);
        assert!(ModelStore::open(&path, OpenMode::ReadWrite).is_ok());
    }

    /// Input that raises the stop flag once `budget` bytes have been consumed,
    /// like an operator pressing Ctrl-C partway through the stream.
    struct InterruptAfter<'a> {
        inner:  Cursor<&'a [u8]>,
        stop:   StopFlag,
        budget: usize,
    }

    impl Read for InterruptAfter<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.inner.read(buf)?;
            self.consume_budget(n);
            Ok(n)
        }
    }

    impl BufRead for InterruptAfter<'_> {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            self.inner.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.inner.consume(amt);
            self.consume_budget(amt);
        }
    }

    impl InterruptAfter<'_> {
        fn consume_budget(&mut self, n: usize) {
            self.budget = self.budget.saturating_sub(n);
            if self.budget == 0 {
                self.stop.raise();
            }
        }
    }

    #[test]
    fn test_interrupt_mid_batch_commits_partial_batch() {
        let dir  = tempfile::tempdir().unwrap();
        let path = model(&dir);
        let before = ModelStore::open(&path, OpenMode::ReadOnly).unwrap().weights().to_vec();

        // Five 10-byte documents; the flag goes up once the third has been read
        let corpus = b"0\t1\n1\t2\n\x0c\n".repeat(5);
        let stop   = StopFlag::new();
        let input  = InterruptAfter { inner: Cursor::new(&corpus[..]), stop: stop.clone(), budget: 30 };

        let summary = TrainUseCase::new(config(path.clone(), 10))
            .execute(input, &stop)
            .unwrap();

        assert_eq!(
            summary,
            TrainSummary { documents: 3, skipped: 0, batches: 1, interrupted: true }
        );

        // The three documents of the unfinished batch reached the file
        let store = ModelStore::open(&path, OpenMode::ReadOnly).unwrap();
        assert_ne!(store.weights(), &before[..]);
        assert!(integrity::check(&store.view()).is_ok());
    }

    #[test]
    fn test_strict_mode_fails_on_bad_line() {
        let dir  = tempfile::tempdir().unwrap();
        let path = model(&dir);

        let result = TrainUseCase::new(TrainConfig { strict: true, ..config(path.clone(), 1) })
            .execute(Cursor::new(&b"0\t1\n\x0c\nnot a record\n"[..]), &StopFlag::new());

        assert!(result.is_err());
        // The model is still a valid file afterwards
        assert!(ModelStore::open(&path, OpenMode::ReadOnly).is_ok());
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let path = model(&dir);
        let result = TrainUseCase::new(config(path, 0)).execute(Cursor::new(CORPUS), &StopFlag::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TrainUseCase::new(config(dir.path().join("none.rbm"), 1))
            .execute(Cursor::new(CORPUS), &StopFlag::new());
        assert!(result.is_err());
    }
}
