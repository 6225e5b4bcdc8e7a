// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Turns the raw ingestion stream into SparseVectors.
//
//   stdin / file
//       │
//       ▼
//   TermFreqReader   → one "<index>\t<count>" line at a time,
//       │              a form-feed line closes the document
//       ▼
//   SparseVector     → handed to the training / inference context
//
// Reference: Rust Book §12 (I/O), std::io::BufRead

/// Reads newline-delimited term-frequency records into SparseVectors
pub mod reader;
