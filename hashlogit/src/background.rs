use std::panic;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, TryRecvError};

use crate::classifier::Classifier;
use crate::dataset::Dataset;
use crate::errors::Result;

/// Classifier handed back by a [`BackgroundTrainer`], together with the result of training.
///
/// On failure the classifier keeps the weights it had before training started.
pub struct TrainingOutcome {
    pub classifier: Classifier,
    pub result: Result<()>,
}

/// Trainer running [`Classifier::train`] on a worker thread.
///
/// # Examples
///
/// ```
/// use hashlogit::{BackgroundTrainer, Classifier, Config, Dataset};
///
/// let classifier = Classifier::new(Config::default().num_features(1024)).unwrap();
/// let mut dataset = Dataset::new();
/// dataset.push("cat cat cat", 1);
/// dataset.push("dog dog dog", 0);
///
/// let trainer = BackgroundTrainer::new(classifier, dataset);
/// let outcome = trainer.join();
/// outcome.result.unwrap();
/// assert!(outcome.classifier.is_trained());
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "multithreading")))]
pub struct BackgroundTrainer {
    result_rx: Receiver<TrainingOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundTrainer {
    /// Moves `classifier` and `dataset` to a new thread and starts training.
    pub fn new(mut classifier: Classifier, dataset: Dataset) -> Self {
        let (result_tx, result_rx) = crossbeam_channel::bounded(1);
        let handle = thread::spawn(move || {
            let result = classifier.train(&dataset.documents, &dataset.labels);
            // The receiver may already be gone if the trainer was dropped.
            let _ = result_tx.send(TrainingOutcome { classifier, result });
        });
        Self {
            result_rx,
            handle: Some(handle),
        }
    }

    /// Gets the outcome if training has finished, without blocking.
    ///
    /// Once the outcome has been returned, subsequent calls return `None`.
    pub fn try_finish(&mut self) -> Option<TrainingOutcome> {
        match self.result_rx.try_recv() {
            Ok(outcome) => {
                self.reap();
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.reap();
                None
            }
        }
    }

    /// Blocks until training has finished.
    ///
    /// # Panics
    ///
    /// A panic of the worker thread is propagated to the caller.
    pub fn join(mut self) -> TrainingOutcome {
        let outcome = self.result_rx.recv();
        self.reap();
        match outcome {
            Ok(outcome) => outcome,
            Err(_) => unreachable!("the worker sends an outcome unless it panics"),
        }
    }

    fn reap(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.join() {
                panic::resume_unwind(e);
            }
        }
    }
}

impl Classifier {
    /// Starts training on a worker thread. This function is the alias of
    /// [`BackgroundTrainer::new()`].
    #[cfg_attr(docsrs, doc(cfg(feature = "multithreading")))]
    pub fn train_in_background(self, dataset: Dataset) -> BackgroundTrainer {
        BackgroundTrainer::new(self, dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::config::Config;
    use crate::errors::HashlogitError;

    fn dataset(pairs: &[(&str, i32)]) -> Dataset {
        let mut dataset = Dataset::new();
        for &(document, label) in pairs {
            dataset.push(document, label);
        }
        dataset
    }

    #[test]
    fn test_join() {
        let classifier = Classifier::new(Config::default().num_features(1024)).unwrap();
        let outcome = classifier
            .train_in_background(dataset(&[("cat cat cat", 1), ("dog dog dog", 0)]))
            .join();

        outcome.result.unwrap();
        let mut classifier = outcome.classifier;
        assert_eq!(1, classifier.classify("cat cat cat").unwrap());
        assert_eq!(0, classifier.classify("dog dog dog").unwrap());
    }

    #[test]
    fn test_try_finish() {
        let classifier = Classifier::new(Config::default().num_features(64)).unwrap();
        let mut trainer = classifier.train_in_background(dataset(&[("a", 1), ("b", 0)]));

        let outcome = loop {
            if let Some(outcome) = trainer.try_finish() {
                break outcome;
            }
            std::thread::sleep(Duration::from_millis(1));
        };
        assert!(outcome.result.is_ok());
        assert!(trainer.try_finish().is_none());
    }

    #[test]
    fn test_join_error_returns_classifier() {
        let classifier = Classifier::new(Config::default().num_features(64)).unwrap();
        let outcome = classifier
            .train_in_background(Dataset {
                documents: vec!["a".to_string()],
                labels: vec![1, 0],
            })
            .join();

        assert!(matches!(
            outcome.result,
            Err(HashlogitError::InvalidArgument(_))
        ));
        assert!(!outcome.classifier.is_trained());
    }
}
