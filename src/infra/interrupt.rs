// ============================================================
// Layer 6 — Operator Interrupt
// ============================================================
// Ctrl-C during a long training run must not lose the batch
// that is half accumulated, and must never land in the middle
// of a Gibbs step. The signal handler therefore only raises a
// flag; the use cases look at it between documents and then
// run their normal shutdown (commit, close stream, close
// model).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

/// Cancellation flag shared between the signal handler and a session.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// A flag raised by Ctrl-C (SIGINT), or by SIGTERM/SIGHUP.
    ///
    /// The ctrlc crate allows one handler per process, so this is
    /// called once, from the CLI.
    pub fn install_ctrlc() -> Result<Self> {
        let flag = Self::new();
        let handler = flag.clone();
        ctrlc::set_handler(move || {
            if handler.0.swap(true, Ordering::SeqCst) {
                // Second Ctrl-C: the operator does not want to wait
                std::process::exit(130);
            }
        })
        .context("Failed to install Ctrl-C handler")?;
        Ok(flag)
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_is_seen_by_clones() {
        let flag = StopFlag::new();
        let other = flag.clone();
        assert!(!other.is_raised());

        flag.raise();
        assert!(other.is_raised());
    }
}
