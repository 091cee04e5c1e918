//! Definition of errors.

use std::fmt;

use thiserror::Error;

pub type Result<T, E = HashlogitError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum HashlogitError {
    #[error(transparent)]
    InvalidModel(#[from] InvalidModelError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    #[error("NotTrainedError: the classifier has neither been trained nor loaded")]
    NotTrained,

    #[error(transparent)]
    NotConverged(#[from] NotConvergedError),

    #[error(transparent)]
    UTF8Error(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    CastError(#[from] std::num::TryFromIntError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl HashlogitError {
    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }
}

/// Error used when the model is invalid.
#[derive(Debug, Error)]
#[error("InvalidModelError: {msg}")]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

/// Error used when the argument is invalid.
#[derive(Debug, Error)]
#[error("InvalidArgumentError: {arg}: {msg}")]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl InvalidArgumentError {
    /// Gets the name of the rejected argument.
    pub const fn arg(&self) -> &'static str {
        self.arg
    }
}

/// Reason why gradient descent gave up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConvergenceFailure {
    /// The iteration budget of a single learning rate was used up while the cost kept rising.
    IterationLimit {
        /// The learning rate that was being tried.
        learning_rate: f64,

        /// The per-rate iteration budget.
        max_iterations: usize,
    },

    /// Every candidate learning rate down to the minimum plateaued without a cost decrease.
    LearningRateExhausted {
        /// The smallest learning rate that was accepted as a candidate.
        min_learning_rate: f64,
    },
}

impl fmt::Display for ConvergenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::IterationLimit {
                learning_rate,
                max_iterations,
            } => write!(
                f,
                "unable to find minimum within {max_iterations} iterations at learning rate {learning_rate}"
            ),
            Self::LearningRateExhausted { min_learning_rate } => write!(
                f,
                "unable to find minimum with any learning rate above {min_learning_rate}"
            ),
        }
    }
}

/// Error used when the optimizer could not find a descending learning rate.
#[derive(Debug, Error)]
#[error("NotConvergedError: {reason}")]
pub struct NotConvergedError {
    pub(crate) reason: ConvergenceFailure,
}

impl NotConvergedError {
    /// Gets the reason of the failure.
    pub const fn reason(&self) -> ConvergenceFailure {
        self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let e = HashlogitError::invalid_argument("labels", "must be 0 or 1");
        assert_eq!("InvalidArgumentError: labels: must be 0 or 1", e.to_string());
    }

    #[test]
    fn test_not_converged_message() {
        let e = HashlogitError::from(NotConvergedError {
            reason: ConvergenceFailure::IterationLimit {
                learning_rate: 3.0,
                max_iterations: 10,
            },
        });
        assert_eq!(
            "NotConvergedError: unable to find minimum within 10 iterations at learning rate 3",
            e.to_string()
        );
    }
}
