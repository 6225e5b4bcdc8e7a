// ============================================================
// Layer 6 — Model Integrity Check
// ============================================================
// A diverging training run leaves NaN or ±Inf behind in the
// parameters, and from then on every activation computed from
// them is NaN as well. check() walks vbias, hbias and the
// weight matrix once and lists every non-finite entry:
//
//   VBIAS[12] <- NAN
//   W[3,7] <- INF
//
// The check only reads. What to do with a failed report is
// up to the caller (the `check` command exits non-zero).

use std::fmt;

use crate::infra::model_store::ModelView;

// ─── Coordinate ───────────────────────────────────────────────────────────────
/// Where a parameter lives in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coordinate {
    VisibleBias(usize),
    HiddenBias(usize),
    /// (visible i, hidden j)
    Weight(usize, usize),
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::VisibleBias(i) => write!(f, "VBIAS[{}]", i),
            Coordinate::HiddenBias(j)  => write!(f, "HBIAS[{}]", j),
            Coordinate::Weight(i, j)   => write!(f, "W[{},{}]", i, j),
        }
    }
}

// ─── Issue ────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Issue {
    pub at:    Coordinate,
    pub value: f32,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.value.is_nan() { "NAN" } else { "INF" };
        write!(f, "{} <- {}", self.at, label)
    }
}

// ─── IntegrityReport ──────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegrityReport {
    pub issues: Vec<Issue>,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Collect every non-finite parameter, in file order.
pub fn check(model: &ModelView<'_>) -> IntegrityReport {
    let mut issues = Vec::new();

    let mut note = |at: Coordinate, value: f32| {
        if !value.is_finite() {
            issues.push(Issue { at, value });
        }
    };

    for (i, &b) in model.vbias.iter().enumerate() {
        note(Coordinate::VisibleBias(i), b);
    }
    for (j, &b) in model.hbias.iter().enumerate() {
        note(Coordinate::HiddenBias(j), b);
    }
    if model.nhid > 0 {
        for (i, row) in model.weights.chunks_exact(model.nhid).enumerate() {
            for (j, &w) in row.iter().enumerate() {
                note(Coordinate::Weight(i, j), w);
            }
        }
    }

    IntegrityReport { issues }
}
