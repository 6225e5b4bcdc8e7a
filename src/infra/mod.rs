// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the operating system rather than
// the maths:
//
//   model_store.rs — The memory-mapped model file
//                    Header validation, typed views over the
//                    mapped parameters, resize with prefix
//                    preservation, the transposed weight
//                    cache, flush and close.
//
//   error.rs       — StoreError, the failures of the model
//                    file (I/O, bad format, read-only).
//
//   integrity.rs   — Scan of all parameters for NaN/Inf.
//
//   interrupt.rs   — Ctrl-C → stop flag, polled between
//                    documents by the use cases.
//
//   config_file.rs — Hyperparameters from a JSON file.
//
// Reference: Rust Book §7 (Modules)
//            memmap2 crate documentation

/// Memory-mapped model file
pub mod model_store;

/// Model file errors
pub mod error;

/// Non-finite parameter scan
pub mod integrity;

/// Operator interrupt flag
pub mod interrupt;

/// JSON hyperparameter files
pub mod config_file;
