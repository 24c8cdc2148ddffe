//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuestionError;

/// Errors emitted by a sentence source.
///
/// These never reach the quiz: the question builder absorbs every variant
/// into placeholder prompt text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SentenceError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("sentence provider returned an empty response")]
    EmptyResponse,
    #[error("sentence request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the quiz engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("at least {needed} vocabulary pairs are required, found {found}")]
    InsufficientPairs { needed: usize, found: usize },
    #[error("not enough distinct distractor meanings: needed {needed}, found {found}")]
    InsufficientDistractors { needed: usize, found: usize },
    #[error("a quiz is already in progress")]
    AlreadyStarted,
    #[error("no quiz is in progress")]
    NotRunning,
    #[error("the current question was already answered")]
    AlreadyAnswered,
    #[error("no answer has been submitted for the current question")]
    NoAnswer,
    #[error("background question build did not complete")]
    Prefetch(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}
