use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of answer options shown per question.
pub const OPTION_COUNT: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("expected {expected} options, got {got}")]
    WrongOptionCount { expected: usize, got: usize },

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("correct meaning is not among the options")]
    MissingCorrectOption,
}

/// One fully built multiple-choice question.
///
/// Immutable once built. The option order is already shuffled; the prompt
/// text is either a generated example sentence or an inline placeholder
/// describing why generation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    term: String,
    correct_meaning: String,
    prompt_text: String,
    options: Vec<String>,
}

impl Question {
    /// Assemble a question, checking the option-set invariants.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` unless there are exactly [`OPTION_COUNT`]
    /// pairwise-distinct options and `correct_meaning` is one of them.
    pub fn new(
        term: impl Into<String>,
        correct_meaning: impl Into<String>,
        prompt_text: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let correct_meaning = correct_meaning.into();

        if options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount {
                expected: OPTION_COUNT,
                got: options.len(),
            });
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }
        if !options.contains(&correct_meaning) {
            return Err(QuestionError::MissingCorrectOption);
        }

        Ok(Self {
            term: term.into(),
            correct_meaning,
            prompt_text: prompt_text.into(),
            options,
        })
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn correct_meaning(&self) -> &str {
        &self.correct_meaning
    }

    #[must_use]
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Whether the given choice is the correct meaning.
    #[must_use]
    pub fn is_correct(&self, choice: &str) -> bool {
        self.correct_meaning == choice
    }
}

/// One incorrectly answered question, kept for the end-of-quiz review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub term: String,
    pub correct_meaning: String,
    pub chosen_meaning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn question_accepts_five_distinct_options_with_correct_among_them() {
        let q = Question::new(
            "laufen",
            "to run",
            "Er läuft jeden Morgen.",
            options(&["to run", "to go", "to eat", "to sleep", "to read"]),
        )
        .unwrap();

        assert_eq!(q.options().len(), OPTION_COUNT);
        assert!(q.is_correct("to run"));
        assert!(!q.is_correct("to go"));
    }

    #[test]
    fn question_rejects_wrong_option_count() {
        let err = Question::new("laufen", "to run", "…", options(&["to run", "to go"])).unwrap_err();
        assert_eq!(
            err,
            QuestionError::WrongOptionCount {
                expected: OPTION_COUNT,
                got: 2
            }
        );
    }

    #[test]
    fn question_rejects_duplicate_options() {
        let err = Question::new(
            "laufen",
            "to run",
            "…",
            options(&["to run", "to go", "to go", "to sleep", "to read"]),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption("to go".into()));
    }

    #[test]
    fn question_rejects_options_without_the_correct_meaning() {
        let err = Question::new(
            "laufen",
            "to run",
            "…",
            options(&["to walk", "to go", "to eat", "to sleep", "to read"]),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::MissingCorrectOption);
    }
}
