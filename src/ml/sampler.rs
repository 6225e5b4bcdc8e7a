// ============================================================
// Layer 5 — Random Sampler
// ============================================================
// The concrete Sampler used by the CLI: rand for uniform and
// Bernoulli draws, rand_distr for the normal and Poisson
// distributions.
//
// Seeding:
//   RngSampler::seeded(seed) → StdRng, reproducible runs
//   RngSampler::from_entropy() → StdRng seeded from the OS
//
// Edge cases of the Poisson draw:
//   λ ≤ 0     → 0 (no events)
//   λ NaN     → NaN (propagates like the rest of the maths)
//   λ = +∞    → +∞
//
// Reference: rand crate documentation, rand_distr::Poisson

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson, StandardNormal};

use crate::domain::traits::Sampler;

pub struct RngSampler<R: Rng> {
    rng: R,
}

impl RngSampler<StdRng> {
    /// Deterministic sampler: same seed, same draws
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Sampler seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Seeded when a seed is given, from entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None       => Self::from_entropy(),
        }
    }
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Sampler for RngSampler<R> {
    fn uniform(&mut self) -> f32 {
        // gen() is in [0, 1); flip it so a zero draw never reaches log()
        1.0 - self.rng.gen::<f32>()
    }

    fn normal(&mut self) -> f32 {
        self.rng.sample(StandardNormal)
    }

    fn bernoulli(&mut self, p: f32) -> f32 {
        if self.rng.gen::<f32>() < p { 1.0 } else { 0.0 }
    }

    fn poisson(&mut self, lambda: f32) -> f32 {
        if !lambda.is_finite() {
            return lambda;
        }
        if lambda <= 0.0 {
            return 0.0;
        }
        match Poisson::new(lambda) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_)   => 0.0,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = RngSampler::seeded(7);
        let mut b = RngSampler::seeded(7);
        for _ in 0..20 {
            assert_eq!(a.normal(), b.normal());
            assert_eq!(a.poisson(3.0), b.poisson(3.0));
        }
    }

    #[test]
    fn test_uniform_is_never_zero() {
        let mut s = RngSampler::seeded(1);
        for _ in 0..10_000 {
            let u = s.uniform();
            assert!(u > 0.0 && u <= 1.0);
        }
    }

    #[test]
    fn test_bernoulli_extremes() {
        let mut s = RngSampler::seeded(2);
        for _ in 0..100 {
            assert_eq!(s.bernoulli(0.0), 0.0);
            assert_eq!(s.bernoulli(1.0), 1.0);
        }
    }

    #[test]
    fn test_poisson_edge_cases() {
        let mut s = RngSampler::seeded(3);
        assert_eq!(s.poisson(0.0), 0.0);
        assert_eq!(s.poisson(-1.0), 0.0);
        assert!(s.poisson(f32::NAN).is_nan());
    }

    #[test]
    fn test_poisson_mean() {
        let mut s = RngSampler::seeded(4);
        let n = 20_000;
        let mean: f32 = (0..n).map(|_| s.poisson(2.5)).sum::<f32>() / n as f32;
        assert!((mean - 2.5).abs() < 0.1, "mean was {}", mean);
    }
}
