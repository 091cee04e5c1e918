//! Logistic scoring functions shared by training and classification.

/// Beyond this magnitude `exp(-z)` over- or underflows, so the sigmoid saturates exactly.
pub const SIGMOID_CLAMP: f64 = 709.0;

/// Predictions are kept this far away from 0 and 1 when taking logarithms.
pub const LOG_EPSILON: f64 = 1e-15;

/// Standard logistic function.
///
/// Returns exactly `0.0` for `z < -709` and exactly `1.0` for `z > 709`.
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    if z < -SIGMOID_CLAMP {
        0.0
    } else if z > SIGMOID_CLAMP {
        1.0
    } else {
        1.0 / (1.0 + (-z).exp())
    }
}

/// Dot product of two vectors of the same length.
#[inline]
pub fn dot(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    xs.iter().zip(ys).map(|(x, y)| x * y).sum()
}

/// Computes the sigmoid of `theta · x` for each observation `x`.
pub fn hypothesis<X>(theta: &[f64], observations: &[X]) -> Vec<f64>
where
    X: AsRef<[f64]>,
{
    observations
        .iter()
        .map(|x| sigmoid(dot(theta, x.as_ref())))
        .collect()
}

/// Mean binary cross-entropy of `theta` over a batch.
///
/// Predictions are clamped into `[1e-15, 1 - 1e-15]`, so the result is finite even when the
/// sigmoid saturates.
pub fn cost<X>(theta: &[f64], examples: &[X], labels: &[f64]) -> f64
where
    X: AsRef<[f64]>,
{
    let predictions = hypothesis(theta, examples);
    let mut cost_1 = 0.0;
    let mut cost_0 = 0.0;
    for (&p, &y) in predictions.iter().zip(labels) {
        let p = p.clamp(LOG_EPSILON, 1.0 - LOG_EPSILON);
        if y == 1.0 {
            cost_1 += y * p.ln();
        } else {
            cost_0 += (1.0 - y) * (1.0 - p).ln();
        }
    }
    -(cost_1 + cost_0) / examples.len() as f64
}
