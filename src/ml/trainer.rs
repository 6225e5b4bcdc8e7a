// ============================================================
// Layer 5 — Training / Inference Context
// ============================================================
// One session over one model. The context owns every scratch
// buffer the Gibbs chain needs, plus the parameter deltas:
//
//   vo  observed visible (the document, dense)
//   ho  hidden activation given vo
//   vr  visible reconstruction (sampled)
//   hr  hidden sample, then hidden activation given vr
//   dw, dv, dh  last delta per parameter (momentum memory)
//
// CD-1 per document:
//   ho = sigmoid(up(vo))          positive phase
//   hr ~ Bernoulli(ho)
//   vr ~ sample(expect(down(hr)))  reconstruction
//   hr = sigmoid(up(vr))          negative phase, NOT resampled
//
// Gradient, per parameter θ with delta memory Δ:
//   d = η·(positive − negative − decay·θ) + momentum·Δ
//   Δ = d
//   Immediate: θ += d right away (and its transposed twin)
//   Deferred:  θ += Δ on commit(), then one transpose refresh
//
// In deferred mode the deltas are overwritten per document,
// so a batch carries earlier documents only through the
// momentum term. reset() clears that memory at batch
// boundaries.
//
// Reference: Hinton (2010) A Practical Guide to Training RBMs,
//            §9 (momentum) §10 (weight decay)

use crate::domain::policy::{Hyperparameters, UpdatePolicy};
use crate::domain::sparse_vector::SparseVector;
use crate::domain::traits::Sampler;
use crate::infra::error::StoreError;
use crate::infra::model_store::ModelStore;
use crate::ml::gibbs::{
    expect_hidden, expect_visible, propagate_down, propagate_up, sample_hidden,
    sample_visible,
};

// ─── ContextConfig ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContextConfig {
    pub hyper:  Hyperparameters,
    pub update: UpdatePolicy,
}

/// Result of `infer_one`.
#[derive(Debug, PartialEq)]
pub enum Inference<'a> {
    /// Hidden activation probabilities, one per hidden unit
    Dense(&'a [f32]),
    /// Hidden units that fired in a stochastic sample
    Sparse(SparseVector),
}

// ─── TrainingContext ──────────────────────────────────────────────────────────
pub struct TrainingContext<'m, S: Sampler> {
    store:   &'m mut ModelStore,
    sampler: S,
    config:  ContextConfig,

    vo: Vec<f32>,
    ho: Vec<f32>,
    vr: Vec<f32>,
    hr: Vec<f32>,

    dw: Vec<f32>,
    dv: Vec<f32>,
    dh: Vec<f32>,

    /// N of the current document
    total_count: usize,
    /// Documents trained since the last commit
    pending:     usize,
}

impl<'m, S: Sampler> TrainingContext<'m, S> {
    pub fn new(store: &'m mut ModelStore, sampler: S, config: ContextConfig) -> Self {
        let (nv, nh) = (store.nvis(), store.nhid());
        tracing::debug!(
            "Training context for {}x{} ({:?} updates, {:?})",
            nv,
            nh,
            config.update,
            config.hyper
        );

        Self {
            store,
            sampler,
            config,
            vo: vec![0.0; nv],
            ho: vec![0.0; nh],
            vr: vec![0.0; nv],
            hr: vec![0.0; nh],
            dw: vec![0.0; nv * nh],
            dv: vec![0.0; nv],
            dh: vec![0.0; nh],
            total_count: 0,
            pending: 0,
        }
    }

    /// One CD-1 step on `doc` followed by the gradient update.
    ///
    /// Fails only when the model is mapped read-only.
    pub fn train_one(&mut self, doc: &SparseVector) -> Result<(), StoreError> {
        self.total_count = doc.populate_dense(&mut self.vo);
        self.gibbs_step();

        let hyper = self.config.hyper;
        let apply = self.config.update == UpdatePolicy::Immediate;
        let params = self.store.params_mut()?;

        update_weights(
            params.weights,
            params.weights_transposed,
            &mut self.dw,
            (&self.vo, &self.ho),
            (&self.vr, &self.hr),
            &hyper,
            apply,
        );
        update_bias(params.vbias, &mut self.dv, &self.vo, &self.vr, &hyper, apply);
        update_bias(params.hbias, &mut self.dh, &self.ho, &self.hr, &hyper, apply);

        self.pending += 1;
        Ok(())
    }

    /// Apply the deltas held back in deferred mode.
    ///
    /// Does nothing when no document was trained since the last
    /// commit, or in immediate mode where nothing is held back.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        if self.pending == 0 {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.pending);
        if self.config.update == UpdatePolicy::Immediate {
            return Ok(());
        }

        {
            let params = self.store.params_mut()?;
            add_assign(params.weights, &self.dw);
            add_assign(params.vbias, &self.dv);
            add_assign(params.hbias, &self.dh);
        }
        self.store.refresh_transposed();

        tracing::debug!("Committed batch of {} document(s)", pending);
        Ok(())
    }

    /// Forget all deltas, and with them the momentum memory.
    pub fn reset(&mut self) {
        for d in self.dw.iter_mut().chain(&mut self.dv).chain(&mut self.dh) {
            *d = 0.0;
        }
    }

    /// Hidden representation of `doc`.
    ///
    /// Without `sample` the activation probabilities are returned as
    /// they are; with it one Bernoulli draw is made and only the
    /// units that fired are returned.
    pub fn infer_one(&mut self, doc: &SparseVector, sample: bool) -> Inference<'_> {
        self.total_count = doc.populate_dense(&mut self.vo);

        let model = self.store.view();
        propagate_up(&mut self.ho, &model, &self.vo);
        expect_hidden(&mut self.ho);

        if !sample {
            return Inference::Dense(&self.ho);
        }

        sample_hidden(&mut self.hr, &self.ho, &mut self.sampler);
        Inference::Sparse(nonzero_counts(&self.hr))
    }

    /// One v → h → v pass from `doc`; returns the sampled visible counts.
    pub fn dream_one(&mut self, doc: &SparseVector) -> SparseVector {
        self.total_count = doc.populate_dense(&mut self.vo);

        let model = self.store.view();
        propagate_up(&mut self.ho, &model, &self.vo);
        expect_hidden(&mut self.ho);
        sample_hidden(&mut self.hr, &self.ho, &mut self.sampler);
        propagate_down(&mut self.vr, &model, &self.hr);
        expect_visible(&mut self.vr, model.units, self.total_count);
        sample_visible(&mut self.vr, model.units, &mut self.sampler);

        nonzero_counts(&self.vr)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn visible_observed(&self) -> &[f32] {
        &self.vo
    }

    pub fn hidden_observed(&self) -> &[f32] {
        &self.ho
    }

    pub fn visible_reconstructed(&self) -> &[f32] {
        &self.vr
    }

    pub fn hidden_reconstructed(&self) -> &[f32] {
        &self.hr
    }

    pub fn store(&self) -> &ModelStore {
        self.store
    }

    fn gibbs_step(&mut self) {
        let model = self.store.view();

        propagate_up(&mut self.ho, &model, &self.vo);
        expect_hidden(&mut self.ho);
        sample_hidden(&mut self.hr, &self.ho, &mut self.sampler);

        propagate_down(&mut self.vr, &model, &self.hr);
        expect_visible(&mut self.vr, model.units, self.total_count);
        sample_visible(&mut self.vr, model.units, &mut self.sampler);

        propagate_up(&mut self.hr, &model, &self.vr);
        expect_hidden(&mut self.hr);
    }
}

// ─── Gradient updates ─────────────────────────────────────────────────────────

/// Shared by the visible and the hidden biases.
fn update_bias(
    bias:          &mut [f32],
    delta:         &mut [f32],
    observed:      &[f32],
    reconstructed: &[f32],
    hyper:         &Hyperparameters,
    apply:         bool,
) {
    assert_eq!(bias.len(), delta.len());
    assert_eq!(bias.len(), observed.len());
    assert_eq!(bias.len(), reconstructed.len());

    for k in 0..bias.len() {
        let mut d = observed[k] - reconstructed[k];
        d -= hyper.decay * bias[k];
        d *= hyper.learning_rate;
        d += hyper.momentum * delta[k];

        delta[k] = d;
        if apply {
            bias[k] += d;
        }
    }
}

fn update_weights(
    weights:    &mut [f32],
    transposed: &mut [f32],
    delta:      &mut [f32],
    (vo, ho):   (&[f32], &[f32]),
    (vr, hr):   (&[f32], &[f32]),
    hyper:      &Hyperparameters,
    apply:      bool,
) {
    let (nv, nh) = (vo.len(), ho.len());
    assert_eq!(weights.len(), nv * nh);
    assert_eq!(transposed.len(), nv * nh);
    assert_eq!(delta.len(), nv * nh);

    for i in 0..nv {
        for j in 0..nh {
            let k = i * nh + j;
            let mut d = vo[i] * ho[j] - vr[i] * hr[j];
            d -= hyper.decay * weights[k];
            d *= hyper.learning_rate;
            d += hyper.momentum * delta[k];

            delta[k] = d;
            if apply {
                weights[k] += d;
                transposed[j * nv + i] += d;
            }
        }
    }
}

fn add_assign(target: &mut [f32], delta: &[f32]) {
    assert_eq!(target.len(), delta.len());
    for (t, d) in target.iter_mut().zip(delta) {
        *t += d;
    }
}

/// Non-zero entries of a sampled layer as (index, count) pairs.
fn nonzero_counts(values: &[f32]) -> SparseVector {
    values
        .iter()
        .enumerate()
        .filter_map(|(k, &v)| {
            let count = v.clamp(0.0, u8::MAX as f32) as u8;
            (count > 0).then_some((k, count))
        })
        .collect()
}
