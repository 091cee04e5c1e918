use std::io::BufRead;

use crate::errors::{HashlogitError, Result};

/// Labeled documents held as two parallel vectors, ready for [`Classifier::train`].
///
/// [`Classifier::train`]: crate::Classifier::train
#[derive(Debug, Default, PartialEq)]
pub struct Dataset {
    pub documents: Vec<String>,
    pub labels: Vec<i32>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Adds one example.
    pub fn push<S>(&mut self, document: S, label: i32)
    where
        S: Into<String>,
    {
        self.documents.push(document.into());
        self.labels.push(label);
    }

    /// Appends examples read from `rdr`.
    ///
    /// Each line holds a label (`0` or `1`), a tab, and the document. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// [`HashlogitError::InvalidArgument`] is returned for a malformed line, with its 1-based
    /// line number. Errors of `rdr` are returned as is.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashlogit::Dataset;
    ///
    /// let mut dataset = Dataset::new();
    /// dataset.extend_from_tsv("1\tcheap pills\n\n0\tsee you at noon\n".as_bytes()).unwrap();
    /// assert_eq!(vec![1, 0], dataset.labels);
    /// ```
    pub fn extend_from_tsv<R>(&mut self, rdr: R) -> Result<()>
    where
        R: BufRead,
    {
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (label, document) = line.split_once('\t').ok_or_else(|| {
                HashlogitError::invalid_argument(
                    "dataset",
                    format!("line {}: expected `<label>\\t<document>`", i + 1),
                )
            })?;
            let label = match label.trim() {
                "0" => 0,
                "1" => 1,
                label => {
                    return Err(HashlogitError::invalid_argument(
                        "dataset",
                        format!("line {}: label must be 0 or 1, got {:?}", i + 1, label),
                    ))
                }
            };
            self.push(document, label);
        }
        Ok(())
    }
}
