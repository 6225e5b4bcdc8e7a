//! Errors raised by the model store.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures touching the model file.
///
/// None of these are retried: a failed truncate or mmap in the middle
/// of a resize leaves the model in an unknown state, so the session
/// has to stop and report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// open/stat/mmap/truncate/msync failed
    #[error("I/O error on model file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a model file, or it is cut short
    #[error("invalid model file '{}': {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    /// A write was attempted through a read-only mapping
    #[error("model file '{}' is opened read-only", .path.display())]
    ReadOnly { path: PathBuf },
}

impl StoreError {
    pub fn format(path: &Path, reason: impl Into<String>) -> Self {
        Self::Format { path: path.to_path_buf(), reason: reason.into() }
    }

    /// Adapter for `map_err` on io results
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io { path: path.to_path_buf(), source }
    }
}
