// ============================================================
// Layer 5 — ML Layer (the Boltzmann machine itself)
// ============================================================
// All numerical code lives here. Nothing in this layer does
// I/O on its own; it reads and writes the parameters through
// the views the model store hands out.
//
//   activation.rs — sigmoid, softmax, factorial, Poisson pmf,
//                   dot product (generic over f32/f64)
//
//   sampler.rs    — RngSampler: the rand-backed implementation
//                   of the Sampler trait
//
//   gibbs.rs      — propagate up/down, expect and sample for
//                   both layers
//
//   trainer.rs    — TrainingContext: CD-1 training with
//                   momentum and decay, deferred or immediate
//                   updates, plus inference and dreaming
//
// Reference: Smolensky (1986), Hinton (2002)
//            Salakhutdinov & Hinton (2009) Replicated Softmax

/// Activation and probability helpers
pub mod activation;

/// rand / rand_distr backed Sampler
pub mod sampler;

/// Gibbs chain primitives
pub mod gibbs;

/// Training and inference context
pub mod trainer;
