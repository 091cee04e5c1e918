use crate::errors::{ConvergenceFailure, HashlogitError, NotConvergedError, Result};
use crate::scoring;

/// Batch gradient descent for logistic regression with learning-rate backoff.
///
/// The optimizer starts from a candidate learning rate and runs full-batch descent steps. The
/// first step that lowers the cost below the previous step's cost accepts the rate, and the
/// coefficients reached at that point are returned. When two consecutive costs differ by less
/// than [`Self::PLATEAU_TOLERANCE`] without decreasing, the rate is divided by
/// [`Self::BACKOFF_FACTOR`] and the search continues from the current coefficients.
///
/// # Examples
///
/// ```
/// use hashlogit::GradientDescent;
///
/// let examples = vec![vec![3.0, 0.0], vec![0.0, 3.0]];
/// let labels = [1.0, 0.0];
///
/// let theta = GradientDescent::new(3.0)
///     .fit(vec![0.0; 2], &examples, &labels)
///     .unwrap();
/// assert!(theta[0] > 0.0);
/// assert!(theta[1] < 0.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct GradientDescent {
    initial_learning_rate: f64,
    max_iterations: usize,
    min_learning_rate: f64,
}

enum Attempt {
    Accepted { iterations: usize, cost: f64 },
    Plateau { iterations: usize },
}

impl GradientDescent {
    /// Per-rate iteration budget for each training example.
    pub const ITERATIONS_PER_EXAMPLE: usize = 500;

    /// Cost changes smaller than this end the attempt at the current rate.
    pub const PLATEAU_TOLERANCE: f64 = 1e-4;

    /// The learning rate is divided by this value after a plateau.
    pub const BACKOFF_FACTOR: f64 = 3.0;

    pub const DEFAULT_MIN_LEARNING_RATE: f64 = 1e-10;

    /// Creates an optimizer starting from `initial_learning_rate`.
    pub const fn new(initial_learning_rate: f64) -> Self {
        Self {
            initial_learning_rate,
            max_iterations: usize::MAX,
            min_learning_rate: Self::DEFAULT_MIN_LEARNING_RATE,
        }
    }

    /// Caps the number of steps tried at each learning rate.
    ///
    /// The budget never exceeds [`Self::ITERATIONS_PER_EXAMPLE`] times the number of examples.
    pub const fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the smallest learning rate that is still tried.
    pub const fn min_learning_rate(mut self, min_learning_rate: f64) -> Self {
        self.min_learning_rate = min_learning_rate;
        self
    }

    /// Fits logistic regression coefficients.
    ///
    /// # Arguments
    ///
    /// * `theta` - Initial coefficients, one per feature.
    /// * `examples` - Feature vectors. Each must have the same length as `theta`.
    /// * `labels` - Target value (0 or 1) of each example.
    ///
    /// # Returns
    ///
    /// Fitted coefficients. The intercept is used during descent but not returned.
    ///
    /// # Errors
    ///
    /// [`HashlogitError::InvalidArgument`] is returned for an empty batch or inconsistent
    /// lengths. [`HashlogitError::NotConverged`] is returned if the iteration budget of a rate
    /// runs out, or if no rate down to the minimum lowers the cost.
    pub fn fit<X>(&self, mut theta: Vec<f64>, examples: &[X], labels: &[f64]) -> Result<Vec<f64>>
    where
        X: AsRef<[f64]>,
    {
        if examples.is_empty() {
            return Err(HashlogitError::invalid_argument(
                "examples",
                "at least one example is required",
            ));
        }
        if examples.len() != labels.len() {
            return Err(HashlogitError::invalid_argument(
                "labels",
                format!(
                    "expected {} labels, got {}",
                    examples.len(),
                    labels.len()
                ),
            ));
        }
        if let Some(i) = examples.iter().position(|x| x.as_ref().len() != theta.len()) {
            return Err(HashlogitError::invalid_argument(
                "examples",
                format!(
                    "example {} has {} features, expected {}",
                    i,
                    examples[i].as_ref().len(),
                    theta.len()
                ),
            ));
        }
        let max_iterations = examples
            .len()
            .saturating_mul(Self::ITERATIONS_PER_EXAMPLE)
            .min(self.max_iterations);
        if max_iterations == 0 {
            return Err(HashlogitError::invalid_argument(
                "max_iterations",
                "must be greater than 0",
            ));
        }

        // The intercept is the coefficient of a constant 1.0 feature placed first.
        let examples: Vec<Vec<f64>> = examples
            .iter()
            .map(|x| {
                let x = x.as_ref();
                let mut augmented = Vec::with_capacity(x.len() + 1);
                augmented.push(1.0);
                augmented.extend_from_slice(x);
                augmented
            })
            .collect();
        theta.insert(0, 0.0);

        let mut learning_rate = self.initial_learning_rate;
        while learning_rate >= self.min_learning_rate {
            log::debug!("Trying learning rate {learning_rate}");
            match Self::descend(&mut theta, &examples, labels, learning_rate, max_iterations)? {
                Attempt::Accepted { iterations, cost } => {
                    log::info!(
                        "Accepted learning rate {learning_rate} after {iterations} iterations (cost: {cost})"
                    );
                    theta.remove(0);
                    return Ok(theta);
                }
                Attempt::Plateau { iterations } => {
                    log::debug!(
                        "Cost plateaued at learning rate {learning_rate} after {iterations} iterations"
                    );
                }
            }
            learning_rate /= Self::BACKOFF_FACTOR;
        }

        let reason = ConvergenceFailure::LearningRateExhausted {
            min_learning_rate: self.min_learning_rate,
        };
        log::warn!("Gradient descent gave up: {reason}");
        Err(NotConvergedError { reason }.into())
    }

    fn descend(
        theta: &mut [f64],
        examples: &[Vec<f64>],
        labels: &[f64],
        learning_rate: f64,
        max_iterations: usize,
    ) -> Result<Attempt> {
        let n_examples = examples.len() as f64;
        let mut gradient = vec![0.0; theta.len()];
        let mut last_cost = None;
        let mut iterations = 0;
        loop {
            let predictions = scoring::hypothesis(theta, examples);
            gradient.fill(0.0);
            for ((x, &p), &y) in examples.iter().zip(&predictions).zip(labels) {
                let residual = p - y;
                for (g, &xj) in gradient.iter_mut().zip(x) {
                    // Hashed vectors are mostly zeros.
                    if xj != 0.0 {
                        *g += residual * xj;
                    }
                }
            }
            for (t, &g) in theta.iter_mut().zip(&gradient) {
                *t -= g / n_examples * learning_rate;
            }
            iterations += 1;

            let cost = scoring::cost(theta, examples, labels);
            if let Some(last_cost) = last_cost {
                if cost < last_cost {
                    return Ok(Attempt::Accepted { iterations, cost });
                }
                if f64::abs(last_cost - cost) < Self::PLATEAU_TOLERANCE {
                    return Ok(Attempt::Plateau { iterations });
                }
            }
            if iterations >= max_iterations {
                let reason = ConvergenceFailure::IterationLimit {
                    learning_rate,
                    max_iterations,
                };
                log::warn!("Gradient descent gave up: {reason}");
                return Err(NotConvergedError { reason }.into());
            }
            last_cost = Some(cost);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_separable() {
        let examples = vec![vec![3.0, 0.0, 0.0], vec![0.0, 3.0, 0.0]];
        let theta = GradientDescent::new(3.0)
            .fit(vec![0.0; 3], &examples, &[1.0, 0.0])
            .unwrap();

        assert_eq!(3, theta.len());
        // The first step moves the coefficients to +-2.25 and the second one is accepted.
        assert!(theta[0] > 2.25 && theta[0] < 2.26);
        assert!((theta[0] + theta[1]).abs() < 1e-9);
        assert_eq!(0.0, theta[2]);
    }

    #[test]
    fn test_fit_small_learning_rate() {
        let examples = [[1.0, 0.0], [0.0, 1.0]];
        let theta = GradientDescent::new(0.01)
            .fit(vec![0.0; 2], &examples, &[0.0, 1.0])
            .unwrap();

        assert!(theta[0] < 0.0);
        assert!(theta[1] > 0.0);
    }

    #[test]
    fn test_fit_keeps_initial_theta() {
        let examples = [[1.0], [2.0]];
        let theta = GradientDescent::new(0.1)
            .fit(vec![5.0], &examples, &[1.0, 1.0])
            .unwrap();

        assert!(theta[0] > 5.0);
    }

    #[test]
    fn test_fit_contradiction_exhausts_learning_rate() {
        let examples = [[1.0], [1.0]];
        let e = GradientDescent::new(3.0)
            .fit(vec![0.0], &examples, &[1.0, 0.0])
            .unwrap_err();

        match e {
            HashlogitError::NotConverged(e) => assert_eq!(
                ConvergenceFailure::LearningRateExhausted {
                    min_learning_rate: GradientDescent::DEFAULT_MIN_LEARNING_RATE,
                },
                e.reason()
            ),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_fit_iteration_limit() {
        let examples = [[1.0], [0.0]];
        let e = GradientDescent::new(3.0)
            .max_iterations(1)
            .fit(vec![0.0], &examples, &[1.0, 0.0])
            .unwrap_err();

        match e {
            HashlogitError::NotConverged(e) => assert_eq!(
                ConvergenceFailure::IterationLimit {
                    learning_rate: 3.0,
                    max_iterations: 1,
                },
                e.reason()
            ),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_fit_min_learning_rate_above_initial() {
        let examples = [[1.0]];
        let e = GradientDescent::new(0.1)
            .min_learning_rate(1.0)
            .fit(vec![0.0], &examples, &[1.0])
            .unwrap_err();

        assert!(matches!(e, HashlogitError::NotConverged(_)));
    }

    #[test]
    fn test_fit_empty() {
        let examples: [[f64; 1]; 0] = [];
        let e = GradientDescent::new(0.1)
            .fit(vec![0.0], &examples, &[])
            .unwrap_err();

        assert_eq!(
            "InvalidArgumentError: examples: at least one example is required",
            e.to_string()
        );
    }

    #[test]
    fn test_fit_label_mismatch() {
        let examples = [[1.0], [2.0]];
        let e = GradientDescent::new(0.1)
            .fit(vec![0.0], &examples, &[1.0])
            .unwrap_err();

        assert_eq!(
            "InvalidArgumentError: labels: expected 2 labels, got 1",
            e.to_string()
        );
    }

    #[test]
    fn test_fit_width_mismatch() {
        let examples = vec![vec![1.0], vec![2.0, 3.0]];
        let e = GradientDescent::new(0.1)
            .fit(vec![0.0], &examples, &[1.0, 0.0])
            .unwrap_err();

        assert_eq!(
            "InvalidArgumentError: examples: example 1 has 2 features, expected 1",
            e.to_string()
        );
    }
}
