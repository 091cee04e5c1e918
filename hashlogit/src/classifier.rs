use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::config::Config;
use crate::errors::{HashlogitError, Result};
use crate::model::{self, Model};
use crate::optimizer::GradientDescent;
use crate::scoring;
use crate::vectorizer::{FeatureDictionary, HashingVectorizer};

/// Documents whose probability reaches this value are classified as `1`.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Binary text classifier.
///
/// A classifier owns its feature dictionary and weights. Every vectorized document, whether
/// used for training or classification, may add tokens to the dictionary.
///
/// # Examples
///
/// ```
/// use hashlogit::{Classifier, Config};
///
/// let mut classifier = Classifier::new(Config::default().num_features(1024)).unwrap();
/// classifier
///     .train(&["cheap pills now", "meeting at noon"], &[1, 0])
///     .unwrap();
/// assert_eq!(1, classifier.classify("cheap pills now").unwrap());
/// ```
pub struct Classifier {
    config: Config,
    dictionary: FeatureDictionary,
    weights: Option<Vec<f64>>,
}

impl Classifier {
    /// Creates an untrained classifier.
    ///
    /// # Errors
    ///
    /// [`HashlogitError::InvalidArgument`] is returned if `config` contains an unusable value.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dictionary: FeatureDictionary::new(),
            weights: None,
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn dictionary(&self) -> &FeatureDictionary {
        &self.dictionary
    }

    /// Gets the weights, or `None` before training or loading.
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub const fn is_trained(&self) -> bool {
        self.weights.is_some()
    }

    /// Converts `text` into a feature vector, recording unseen tokens in the dictionary.
    pub fn vectorize(&mut self, text: &str) -> Vec<f64> {
        HashingVectorizer::new(&mut self.dictionary, self.config.get_num_features()).vectorize(text)
    }

    /// Trains the classifier, replacing any previous weights.
    ///
    /// # Arguments
    ///
    /// * `documents` - Training documents.
    /// * `labels` - The label (0 or 1) of each document.
    ///
    /// # Errors
    ///
    /// [`HashlogitError::InvalidArgument`] is returned before anything is modified if the
    /// lengths differ, the batch is empty, or a label is neither 0 nor 1.
    /// [`HashlogitError::NotConverged`] is returned if gradient descent fails; the previous
    /// weights are kept in that case.
    pub fn train<D>(&mut self, documents: &[D], labels: &[i32]) -> Result<()>
    where
        D: AsRef<str>,
    {
        let labels = Self::check_batch(documents.len(), labels)?;
        let examples: Vec<_> = documents
            .iter()
            .map(|doc| self.vectorize(doc.as_ref()))
            .collect();
        let theta = vec![0.0; self.config.get_num_features()];
        let weights = GradientDescent::new(self.config.get_learning_rate())
            .max_iterations(usize::try_from(self.config.get_iterations())?)
            .fit(theta, &examples, &labels)?;
        self.weights = Some(weights);
        Ok(())
    }

    /// Computes the probability that `document` belongs to class 1.
    ///
    /// # Errors
    ///
    /// [`HashlogitError::NotTrained`] is returned if there are no weights yet.
    pub fn probability(&mut self, document: &str) -> Result<f64> {
        if self.weights.is_none() {
            return Err(HashlogitError::NotTrained);
        }
        let x = self.vectorize(document);
        let weights = self.weights.as_deref().ok_or(HashlogitError::NotTrained)?;
        Ok(scoring::sigmoid(scoring::dot(&x, weights)))
    }

    /// Predicts the label (0 or 1) of `document`.
    ///
    /// # Errors
    ///
    /// [`HashlogitError::NotTrained`] is returned if there are no weights yet.
    pub fn classify(&mut self, document: &str) -> Result<u8> {
        let p = self.probability(document)?;
        Ok(u8::from(p >= DECISION_THRESHOLD))
    }

    /// Computes the mean log loss of the current weights on a labeled batch.
    ///
    /// # Errors
    ///
    /// Arguments are checked like in [`Self::train`]. [`HashlogitError::NotTrained`] is
    /// returned if there are no weights yet.
    pub fn loss<D>(&mut self, documents: &[D], labels: &[i32]) -> Result<f64>
    where
        D: AsRef<str>,
    {
        if self.weights.is_none() {
            return Err(HashlogitError::NotTrained);
        }
        let labels = Self::check_batch(documents.len(), labels)?;
        let examples: Vec<_> = documents
            .iter()
            .map(|doc| self.vectorize(doc.as_ref()))
            .collect();
        let weights = self.weights.as_deref().ok_or(HashlogitError::NotTrained)?;
        Ok(scoring::cost(weights, &examples, &labels))
    }

    /// Exports the weights and the dictionary.
    pub fn write<W>(&self, wtr: W) -> Result<usize>
    where
        W: Write,
    {
        model::write_parts(
            self.weights.as_deref().unwrap_or_default(),
            &self.dictionary,
            wtr,
        )
    }

    /// Replaces the weights and the dictionary with `model`.
    ///
    /// A model without weights leaves the classifier untrained.
    ///
    /// # Errors
    ///
    /// [`HashlogitError::InvalidModel`] is returned if the model does not fit the configured
    /// number of features. The classifier is not modified in that case.
    pub fn set_model(&mut self, model: Model) -> Result<()> {
        model.check_num_features(self.config.get_num_features())?;
        let (weights, dictionary) = model.into_parts();
        self.weights = Some(weights).filter(|w| !w.is_empty());
        self.dictionary = dictionary;
        Ok(())
    }

    /// Saves the model to `path`.
    ///
    /// # Errors
    ///
    /// An I/O error is returned if the file cannot be created or written.
    pub fn save_model<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let mut f = BufWriter::new(File::create(path)?);
        self.write(&mut f)?;
        f.flush()?;
        Ok(())
    }

    /// Loads a model from `path`, replacing the weights and the dictionary.
    ///
    /// # Errors
    ///
    /// An I/O error is returned if the file cannot be opened or ends early. On any error the
    /// classifier is not modified.
    pub fn load_model<P>(&mut self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let f = BufReader::new(File::open(path)?);
        self.set_model(Model::read(f)?)
    }

    fn check_batch(n_documents: usize, labels: &[i32]) -> Result<Vec<f64>> {
        if n_documents != labels.len() {
            return Err(HashlogitError::invalid_argument(
                "labels",
                format!(
                    "{} documents were given with {} labels",
                    n_documents,
                    labels.len()
                ),
            ));
        }
        if n_documents == 0 {
            return Err(HashlogitError::invalid_argument(
                "documents",
                "at least one document is required",
            ));
        }
        labels
            .iter()
            .map(|&label| match label {
                0 | 1 => Ok(f64::from(label)),
                _ => Err(HashlogitError::invalid_argument(
                    "labels",
                    format!("label must be 0 or 1, got {label}"),
                )),
            })
            .collect()
    }
}
