// ============================================================
// Layer 3 — Unit and Update Policies
// ============================================================
// The machine can be run under a few alternative rules:
//
//   VisibleUnits — how the visible layer turns pre-activations
//                  into expectations and samples:
//     ReplicatedSoftmax  softmax(pre) × N, Poisson samples
//                        (Salakhutdinov & Hinton, 2009)
//     Exponential        exp(pre), Poisson samples
//                        (Gehler, Holub & Welling, 2006)
//     Binary             sigmoid(pre), Bernoulli samples
//
//   UpdatePolicy — when gradient deltas reach the live weights:
//     Deferred   accumulate in the context, apply on commit()
//     Immediate  apply after every document
//
// The visible unit kind is chosen once, when the model file is
// created, and stored in the file header. The update policy is
// picked per training session.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};

// ─── VisibleUnits ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibleUnits {
    /// Multinomial over the vocabulary, scaled by document length
    #[default]
    ReplicatedSoftmax,
    /// Unnormalised exponential (Poisson rate) per unit
    Exponential,
    /// Plain binary units
    Binary,
}

impl VisibleUnits {
    /// Byte stored in `flags[0]` of the model file header
    pub fn to_flag(self) -> u8 {
        match self {
            VisibleUnits::ReplicatedSoftmax => 0,
            VisibleUnits::Exponential       => 1,
            VisibleUnits::Binary            => 2,
        }
    }

    /// Inverse of `to_flag`; `None` for bytes we never write
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(VisibleUnits::ReplicatedSoftmax),
            1 => Some(VisibleUnits::Exponential),
            2 => Some(VisibleUnits::Binary),
            _ => None,
        }
    }

    /// Short label of the sampling distribution, as printed by `info`
    pub fn distribution(self) -> &'static str {
        match self {
            VisibleUnits::ReplicatedSoftmax | VisibleUnits::Exponential => "poiss",
            VisibleUnits::Binary => "binary",
        }
    }
}

// ─── UpdatePolicy ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdatePolicy {
    #[default]
    Deferred,
    Immediate,
}

// ─── Hyperparameters ──────────────────────────────────────────────────────────
/// Gradient update constants.
///
/// Δθ = η·(positive − negative − decay·θ) + momentum·Δθ_prev
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// η, the step size applied to the CD-1 gradient
    pub learning_rate: f32,

    /// Fraction of the previous delta carried into the next one
    pub momentum: f32,

    /// L2 pull towards zero; 0 disables it
    pub decay: f32,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.02,
            momentum:      0.9,
            decay:         0.0,
        }
    }
}
