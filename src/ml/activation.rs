// ============================================================
// Layer 5 — Activation Math
// ============================================================
// Scalar and vector helpers used by every layer computation:
//
//   sigmoid(x)        = (1 + tanh(x/2)) / 2
//   softmax(v)        = exp(v - logsumexp(v))
//   factorial(n)      exact table up to 15!, then multiply on
//   poisson_pmf(λ, n) = exp(-λ)·λⁿ / n!
//
// sigmoid is written with tanh rather than 1/(1+exp(-x)):
// exp(-x) overflows for large negative x, tanh saturates
// cleanly at ±1.
//
// softmax subtracts the maximum and normalises in the log
// domain, so [1000, 0, 0] gives [1, 0, 0] instead of NaN.
//
// Everything is generic over the Real trait, implemented for
// f32 (used by the machine) and f64.
//
// All functions are pure. NaN in, NaN out.
//
// Reference: Bishop (2006) PRML §4.3.4, §2.3.9

use std::ops::{Add, Div, Mul, Neg, Sub};

// ─── Real ─────────────────────────────────────────────────────────────────────
/// The floating point operations the activation helpers need.
pub trait Real:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;
    const NEG_INFINITY: Self;

    fn from_u8(n: u8) -> Self;
    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn tanh(self) -> Self;
}

macro_rules! impl_real {
    ($t:ty) => {
        impl Real for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const TWO: Self = 2.0;
            const NEG_INFINITY: Self = <$t>::NEG_INFINITY;

            fn from_u8(n: u8) -> Self {
                n as $t
            }
            fn exp(self) -> Self {
                <$t>::exp(self)
            }
            fn ln(self) -> Self {
                <$t>::ln(self)
            }
            fn tanh(self) -> Self {
                <$t>::tanh(self)
            }
        }
    };
}

impl_real!(f32);
impl_real!(f64);

// ─── Scalar functions ─────────────────────────────────────────────────────────

/// Logistic function, strictly inside (0, 1) wherever tanh is not saturated.
pub fn sigmoid<T: Real>(x: T) -> T {
    (T::ONE + (x / T::TWO).tanh()) / T::TWO
}

/// 0! through 15!, exactly representable in f32 and f64
const FACTORIALS: [f64; 16] = [
    1.0,
    1.0,
    2.0,
    6.0,
    24.0,
    120.0,
    720.0,
    5040.0,
    40320.0,
    362880.0,
    3628800.0,
    39916800.0,
    479001600.0,
    6227020800.0,
    87178291200.0,
    1307674368000.0,
];

/// n!, by table lookup for n ≤ 15 and by multiplication from 16 on.
pub fn factorial<T: Real + FromF64>(n: u8) -> T {
    if let Some(&exact) = FACTORIALS.get(n as usize) {
        return T::from_f64(exact);
    }

    let mut res = T::from_f64(FACTORIALS[15]);
    for k in 16..=n {
        res = res * T::from_u8(k);
    }
    res
}

/// Probability of `n` events under a Poisson distribution with rate `lambda`.
pub fn poisson_pmf<T: Real + FromF64>(lambda: T, n: u8) -> T {
    let mut res = (-lambda).exp();
    for _ in 0..n {
        res = res * lambda;
    }
    res / factorial::<T>(n)
}

/// Lossy conversion from the f64 factorial table.
pub trait FromF64 {
    fn from_f64(x: f64) -> Self;
}

impl FromF64 for f32 {
    fn from_f64(x: f64) -> Self {
        x as f32
    }
}

impl FromF64 for f64 {
    fn from_f64(x: f64) -> Self {
        x
    }
}

// ─── Vector functions ─────────────────────────────────────────────────────────

/// Numerically stable softmax, in place.
///
/// Subtracts the maximum before exponentiating and divides by the
/// sum in the log domain: v[i] = exp(v[i] - (max + ln Σ exp(v[k] - max))).
pub fn softmax<T: Real>(values: &mut [T]) {
    let mut max = T::NEG_INFINITY;
    for &x in values.iter() {
        if x > max {
            max = x;
        }
    }

    let mut sum = T::ZERO;
    for &x in values.iter() {
        sum = sum + (x - max).exp();
    }

    let log_sum = sum.ln() + max;
    for x in values.iter_mut() {
        *x = (*x - log_sum).exp();
    }
}

/// Plain exp-and-divide softmax, in place.
///
/// Overflows to NaN once any input exceeds the exponent range;
/// kept for comparison against `softmax`.
pub fn softmax_unstable<T: Real>(values: &mut [T]) {
    let mut sum = T::ZERO;
    for x in values.iter_mut() {
        *x = x.exp();
        sum = sum + *x;
    }
    for x in values.iter_mut() {
        *x = *x / sum;
    }
}

/// Dot product over two equally long slices.
///
/// Accumulates four lanes at a time, which the optimiser turns
/// into SIMD on targets that have it.
pub fn dot(x: &[f32], y: &[f32]) -> f32 {
    assert_eq!(x.len(), y.len(), "dot product over slices of different length");

    let mut lanes = [0.0f32; 4];
    let xs = x.chunks_exact(4);
    let ys = y.chunks_exact(4);
    let (x_tail, y_tail) = (xs.remainder(), ys.remainder());

    for (a, b) in xs.zip(ys) {
        lanes[0] += a[0] * b[0];
        lanes[1] += a[1] * b[1];
        lanes[2] += a[2] * b[2];
        lanes[3] += a[3] * b[3];
    }

    let mut sum = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);
    for (a, b) in x_tail.iter().zip(y_tail) {
        sum += a * b;
    }
    sum
}
