use std::fmt;
use std::sync::Arc;

use log::warn;
use rand::seq::SliceRandom;

use quiz_core::model::{OPTION_COUNT, Question, VocabPair};

use crate::error::QuizError;
use crate::pair_pool::distinct_distractors;
use crate::sentence_service::SentenceSource;

/// Distractors per question; the fifth option is the correct meaning.
pub const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;

/// Builds one complete question from one pair.
///
/// Holds only shared immutable inputs (the pair-list snapshot and the
/// sentence source), so clones are cheap and a clone can be moved onto a
/// background task without touching any session state.
#[derive(Clone)]
pub struct QuestionBuilder {
    pairs: Arc<[VocabPair]>,
    source: Arc<dyn SentenceSource>,
}

impl QuestionBuilder {
    #[must_use]
    pub fn new(pairs: Arc<[VocabPair]>, source: Arc<dyn SentenceSource>) -> Self {
        Self { pairs, source }
    }

    /// Build the question for one pair: example sentence, four distractors,
    /// shuffled option order.
    ///
    /// A failed sentence call is rendered into the prompt text instead of
    /// being returned, so the quiz proceeds no matter what the external
    /// service does.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientDistractors` when the pair list
    /// cannot supply four distinct distractor meanings.
    pub async fn build(&self, pair: &VocabPair) -> Result<Question, QuizError> {
        let prompt_text = match self.source.sentence(pair.term()).await {
            Ok(sentence) => sentence,
            Err(err) => {
                warn!("sentence generation failed for '{}': {err}", pair.term());
                format!("[sentence generation failed for '{}': {err}]", pair.term())
            }
        };

        let distractors = distinct_distractors(&self.pairs, pair.meaning(), DISTRACTOR_COUNT)?;
        let mut options: Vec<String> = distractors
            .iter()
            .map(|d| d.meaning().to_string())
            .collect();
        options.push(pair.meaning().to_string());
        options.shuffle(&mut rand::rng());

        Ok(Question::new(
            pair.term(),
            pair.meaning(),
            prompt_text,
            options,
        )?)
    }
}

impl fmt::Debug for QuestionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionBuilder")
            .field("pairs_len", &self.pairs.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use async_trait::async_trait;

    use crate::error::SentenceError;

    struct EchoSource;

    #[async_trait]
    impl SentenceSource for EchoSource {
        async fn sentence(&self, term: &str) -> Result<String, SentenceError> {
            Ok(format!("Beispiel mit {term}."))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SentenceSource for FailingSource {
        async fn sentence(&self, _term: &str) -> Result<String, SentenceError> {
            Err(SentenceError::MissingApiKey)
        }
    }

    fn pairs(n: usize) -> Arc<[VocabPair]> {
        (0..n)
            .map(|i| VocabPair::new(format!("term{i}"), format!("meaning{i}")))
            .collect::<Vec<_>>()
            .into()
    }

    #[tokio::test]
    async fn builds_five_unique_options_including_the_correct_meaning() {
        let pairs = pairs(8);
        let builder = QuestionBuilder::new(Arc::clone(&pairs), Arc::new(EchoSource));

        let question = builder.build(&pairs[0]).await.unwrap();

        assert_eq!(question.term(), pairs[0].term());
        assert_eq!(question.options().len(), OPTION_COUNT);
        let unique: HashSet<&String> = question.options().iter().collect();
        assert_eq!(unique.len(), OPTION_COUNT);
        assert!(question.options().contains(&pairs[0].meaning().to_string()));
        assert_eq!(question.prompt_text(), format!("Beispiel mit {}.", pairs[0].term()));
    }

    #[tokio::test]
    async fn sentence_failure_becomes_placeholder_text() {
        let pairs = pairs(5);
        let builder = QuestionBuilder::new(Arc::clone(&pairs), Arc::new(FailingSource));

        let question = builder.build(&pairs[2]).await.unwrap();

        assert!(question.prompt_text().starts_with(&format!(
            "[sentence generation failed for '{}':",
            pairs[2].term()
        )));
        assert_eq!(question.options().len(), OPTION_COUNT);
    }
}
