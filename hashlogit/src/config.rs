use crate::errors::{HashlogitError, Result};

/// Construction-time settings of a [`Classifier`](crate::Classifier).
///
/// # Examples
///
/// ```
/// use hashlogit::Config;
///
/// let config = Config::default().num_features(1 << 16).learning_rate(3.0);
/// assert_eq!(1 << 16, config.get_num_features());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    learning_rate: f64,
    iterations: u32,
    num_features: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            iterations: 200_000,
            num_features: 100_000,
        }
    }
}

impl Config {
    /// Sets the first candidate learning rate of the backoff search.
    pub const fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the upper limit of gradient steps tried at each learning rate.
    ///
    /// The effective limit is the smaller of this value and 500 times the number of examples.
    pub const fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the width of every feature vector and of the weight vector.
    pub const fn num_features(mut self, num_features: usize) -> Self {
        self.num_features = num_features;
        self
    }

    pub const fn get_learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub const fn get_iterations(&self) -> u32 {
        self.iterations
    }

    pub const fn get_num_features(&self) -> usize {
        self.num_features
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.num_features == 0 {
            return Err(HashlogitError::invalid_argument(
                "num_features",
                "must be greater than 0",
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(HashlogitError::invalid_argument(
                "learning_rate",
                format!("must be a positive finite number, got {}", self.learning_rate),
            ));
        }
        if self.iterations == 0 {
            return Err(HashlogitError::invalid_argument(
                "iterations",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(0.01, config.get_learning_rate());
        assert_eq!(200_000, config.get_iterations());
        assert_eq!(100_000, config.get_num_features());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_features() {
        let e = Config::default().num_features(0).validate().unwrap_err();
        assert_eq!(
            "InvalidArgumentError: num_features: must be greater than 0",
            e.to_string()
        );
    }

    #[test]
    fn test_bad_learning_rate() {
        assert!(Config::default().learning_rate(0.0).validate().is_err());
        assert!(Config::default().learning_rate(-1.0).validate().is_err());
        assert!(Config::default().learning_rate(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_zero_iterations() {
        assert!(Config::default().iterations(0).validate().is_err());
    }
}
