// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe what the machine works on,
// independent of how the model file is stored or how the
// Gibbs chain is run.
//
// Rules for this layer:
//   - NO file I/O or memory mapping
//   - NO random number generation (only the Sampler trait)
//   - Only plain structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

// One bag-of-words document as (index, count) pairs
pub mod sparse_vector;

// Visible unit kinds and weight update policies
pub mod policy;

// Core abstractions (traits) that other layers implement
pub mod traits;
