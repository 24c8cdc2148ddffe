#![forbid(unsafe_code)]

pub mod error;
pub mod pair_pool;
pub mod prefetch;
pub mod question_builder;
pub mod quiz_service;
pub mod sentence_service;

pub use quiz_core::Clock;

pub use error::{QuizError, SentenceError};
pub use pair_pool::{MIN_PAIRS, PairPool};
pub use prefetch::PrefetchJob;
pub use question_builder::{DISTRACTOR_COUNT, QuestionBuilder};
pub use quiz_service::{
    AdvanceOutcome, Feedback, Progress, QuizService, QuizState, QuizSummary,
};
pub use sentence_service::{SentenceConfig, SentenceService, SentenceSource};
