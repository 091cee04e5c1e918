use hashbrown::HashMap;

use crate::utils;

/// Mapping from tokens to the vector slots they were first hashed into.
///
/// The dictionary only grows. Every distinct token seen by any vectorization is kept for the
/// lifetime of the owner, so memory use is unbounded in the number of distinct tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureDictionary {
    slots: HashMap<String, usize>,
}

impl FeatureDictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the slot assigned to `token`.
    pub fn get(&self, token: &str) -> Option<usize> {
        self.slots.get(token).copied()
    }

    /// Gets the slot of `token`, assigning `slot` first if the token is unknown.
    pub(crate) fn get_or_insert(&mut self, token: &str, slot: usize) -> usize {
        if let Some(&slot) = self.slots.get(token) {
            slot
        } else {
            self.slots.insert(token.to_string(), slot);
            slot
        }
    }

    pub(crate) fn insert(&mut self, token: String, slot: usize) {
        self.slots.insert(token, slot);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over `(token, slot)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.slots.iter().map(|(token, &slot)| (token.as_str(), slot))
    }
}

/// Feature-hashing vectorizer.
///
/// Tokens are the whitespace-delimited pieces of the input. No normalization is applied.
pub struct HashingVectorizer<'a> {
    dictionary: &'a mut FeatureDictionary,
    num_features: usize,
}

impl<'a> HashingVectorizer<'a> {
    /// Creates a vectorizer writing new tokens into `dictionary`.
    ///
    /// `num_features` must be greater than 0.
    pub fn new(dictionary: &'a mut FeatureDictionary, num_features: usize) -> Self {
        debug_assert!(num_features != 0);
        Self {
            dictionary,
            num_features,
        }
    }

    /// Converts `text` into a vector of `num_features` token counts.
    ///
    /// A token keeps the slot recorded in the dictionary when it was first seen. Tokens sharing
    /// a slot add up in the same entry.
    pub fn vectorize(&mut self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.num_features];
        for token in text.split_whitespace() {
            let slot = self.dictionary.get_or_insert(token, self.slot_of(token));
            vector[slot] += 1.0;
        }
        vector
    }

    fn slot_of(&self, token: &str) -> usize {
        // usize is at most 64 bits wide, so the remainder always fits.
        (utils::hash_bytes(token.as_bytes()) % self.num_features as u64) as usize
    }
}
