// ============================================================
// Layer 5 — Gibbs Propagation Primitives
// ============================================================
// The six steps a Gibbs chain is built from. Each one reads
// the model and an input buffer and writes only its output:
//
//   propagate_up    h[j] = hbias[j] + Σ_i w[i][j]·v[i]
//   expect_hidden   h[j] = sigmoid(h[j])
//   sample_hidden   s[j] = Bernoulli(p[j])
//   propagate_down  v[i] = vbias[i] + Σ_j w[i][j]·h[j]
//   expect_visible  ReplicatedSoftmax  v = softmax(v) · N
//                   Exponential        v[i] = exp(v[i])
//                   Binary             v[i] = sigmoid(v[i])
//   sample_visible  Poisson(v[i]), or Bernoulli(v[i]) for
//                   binary visible units
//
// propagate_up walks the transposed weights, so each hidden
// unit is one contiguous dot product; propagate_down walks
// the canonical visible-major matrix the same way.
//
// Buffer lengths are part of the contract: a mismatch is a
// bug in the caller and panics.
//
// Reference: Hinton (2002) Training Products of Experts by
//            Minimizing Contrastive Divergence
//            Salakhutdinov & Hinton (2009) Replicated Softmax

use crate::domain::policy::VisibleUnits;
use crate::domain::traits::Sampler;
use crate::infra::model_store::ModelView;
use crate::ml::activation::{dot, sigmoid, softmax};

/// Visible → hidden pre-activation.
pub fn propagate_up(hidden: &mut [f32], model: &ModelView<'_>, visible: &[f32]) {
    assert_eq!(hidden.len(), model.nhid, "hidden buffer does not match the model");
    assert_eq!(visible.len(), model.nvis, "visible buffer does not match the model");

    let nvis = model.nvis;
    for (j, h) in hidden.iter_mut().enumerate() {
        let row = &model.weights_transposed[j * nvis..(j + 1) * nvis];
        *h = model.hbias[j] + dot(row, visible);
    }
}

/// Hidden pre-activation → Bernoulli probability, in place.
pub fn expect_hidden(hidden: &mut [f32]) {
    for h in hidden.iter_mut() {
        *h = sigmoid(*h);
    }
}

/// Draw binary hidden states from their probabilities.
pub fn sample_hidden(states: &mut [f32], probs: &[f32], sampler: &mut impl Sampler) {
    assert_eq!(states.len(), probs.len(), "hidden buffers differ in length");

    for (s, &p) in states.iter_mut().zip(probs) {
        *s = sampler.bernoulli(p);
    }
}

/// Hidden → visible pre-activation.
pub fn propagate_down(visible: &mut [f32], model: &ModelView<'_>, hidden: &[f32]) {
    assert_eq!(visible.len(), model.nvis, "visible buffer does not match the model");
    assert_eq!(hidden.len(), model.nhid, "hidden buffer does not match the model");

    let nhid = model.nhid;
    for (i, v) in visible.iter_mut().enumerate() {
        let row = &model.weights[i * nhid..(i + 1) * nhid];
        *v = model.vbias[i] + dot(row, hidden);
    }
}

/// Visible pre-activation → expected value, in place.
///
/// `total_count` is the document length N; only the replicated
/// softmax uses it.
pub fn expect_visible(visible: &mut [f32], units: VisibleUnits, total_count: usize) {
    match units {
        VisibleUnits::ReplicatedSoftmax => {
            softmax(visible);
            let n = total_count as f32;
            for v in visible.iter_mut() {
                *v *= n;
            }
        }
        VisibleUnits::Exponential => {
            for v in visible.iter_mut() {
                *v = v.exp();
            }
        }
        VisibleUnits::Binary => {
            for v in visible.iter_mut() {
                *v = sigmoid(*v);
            }
        }
    }
}

/// Replace each expected value with a draw around it, in place.
pub fn sample_visible(visible: &mut [f32], units: VisibleUnits, sampler: &mut impl Sampler) {
    match units {
        VisibleUnits::ReplicatedSoftmax | VisibleUnits::Exponential => {
            for v in visible.iter_mut() {
                *v = sampler.poisson(*v);
            }
        }
        VisibleUnits::Binary => {
            for v in visible.iter_mut() {
                *v = sampler.bernoulli(*v);
            }
        }
    }
}
