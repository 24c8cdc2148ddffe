use serde::{Deserialize, Serialize};
use std::fmt;

/// One vocabulary entry: a term and its meaning.
///
/// Pairs are immutable once loaded. Meanings are compared as plain strings;
/// two different terms may carry the same meaning, and distractor selection
/// accounts for that.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabPair {
    term: String,
    meaning: String,
}

impl VocabPair {
    #[must_use]
    pub fn new(term: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            meaning: meaning.into(),
        }
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn meaning(&self) -> &str {
        &self.meaning
    }
}

impl fmt::Debug for VocabPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VocabPair({} [{}])", self.term, self.meaning)
    }
}

impl fmt::Display for VocabPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.term, self.meaning)
    }
}
