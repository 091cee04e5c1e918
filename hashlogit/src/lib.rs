#![cfg_attr(docsrs, feature(doc_cfg))]

//! # hashlogit
//!
//! hashlogit is a binary text classifier based on feature hashing and logistic regression.
//!
//! ## Examples
//!
//! ```no_run
//! use std::io::{prelude::*, stdin};
//!
//! use hashlogit::{Classifier, Config};
//!
//! let mut classifier = Classifier::new(Config::default()).unwrap();
//! classifier.load_model("model.bin").unwrap();
//!
//! for line in stdin().lock().lines() {
//!     let label = classifier.classify(&line.unwrap()).unwrap();
//!     println!("{}", label);
//! }
//! ```
//!
//! Training on a worker thread requires **crate feature** `multithreading` (enabled by
//! default). For more details, see [`BackgroundTrainer`].

mod utils;

mod classifier;
mod config;
mod dataset;
pub mod errors;
mod model;
mod optimizer;
pub mod scoring;
mod vectorizer;

#[cfg(feature = "multithreading")]
mod background;

pub use classifier::{Classifier, DECISION_THRESHOLD};
pub use config::Config;
pub use dataset::Dataset;
pub use model::Model;
pub use optimizer::GradientDescent;
pub use vectorizer::{FeatureDictionary, HashingVectorizer};

#[cfg(feature = "multithreading")]
pub use background::{BackgroundTrainer, TrainingOutcome};
