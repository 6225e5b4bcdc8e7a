// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per command. Each takes a plain config struct
// (never clap types), opens what it needs from the lower
// layers and releases it again before returning.
//
// Rules for this layer:
//   - No maths here (that's Layer 5)
//   - No argument parsing here (that's Layer 1)
//   - Output goes to the writer the caller hands in
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Shared read → stop-check → handle loop
pub mod document_loop;

// Create or resize a model file
pub mod init_use_case;

// CD-1 training over a document stream
pub mod train_use_case;

// Hidden representations of a document stream
pub mod prop_use_case;

// Visible reconstructions of a document stream
pub mod dream_use_case;

// Dimensions of model files
pub mod info_use_case;

// NaN/Inf scan of a model file
pub mod check_use_case;
