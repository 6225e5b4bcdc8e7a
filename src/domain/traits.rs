// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The Gibbs chain and the weight initialisation both need
// random draws, but neither should care where they come from.
// They only see the Sampler trait:
//   - RngSampler (Layer 5) → backed by rand / rand_distr
//   - test stubs           → deterministic draws
//
// Same for the source of documents: the training and
// inference use cases read through DocumentSource and do
// not know whether the documents come from stdin or a file.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::sparse_vector::SparseVector;

// ─── Sampler ──────────────────────────────────────────────────────────────────
/// The random number service consumed by the machine.
///
/// All draws are returned as f32 because every layer buffer is f32.
pub trait Sampler {
    /// Uniform draw from the half-open interval (0, 1]
    fn uniform(&mut self) -> f32;

    /// Standard normal draw, N(0, 1)
    fn normal(&mut self) -> f32;

    /// 1.0 with probability `p`, otherwise 0.0
    fn bernoulli(&mut self, p: f32) -> f32;

    /// Poisson draw with rate `lambda`
    fn poisson(&mut self, lambda: f32) -> f32;
}

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Anything that yields one sparse document at a time.
pub trait DocumentSource {
    /// Read the next document.
    /// Returns `Ok(None)` once the input is exhausted.
    fn next_document(&mut self) -> Result<Option<&SparseVector>>;
}
