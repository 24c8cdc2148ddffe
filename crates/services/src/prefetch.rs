use log::debug;
use tokio::task::JoinHandle;

use quiz_core::model::{Question, VocabPair};

use crate::error::QuizError;
use crate::question_builder::QuestionBuilder;

/// One in-flight background question build.
///
/// The job owns the task handle and nothing else; the build receives only
/// the moved pair and the builder's shared immutable inputs, never session
/// state. Joining takes the job by value, so a result can be read at most
/// once. Dropping an unjoined job detaches the task: the build runs to
/// completion and its result is discarded unseen.
#[derive(Debug)]
pub struct PrefetchJob {
    handle: JoinHandle<Result<Question, QuizError>>,
}

impl PrefetchJob {
    /// Spawn the build for a pair that was already popped from the pool.
    #[must_use]
    pub fn start(builder: QuestionBuilder, pair: VocabPair) -> Self {
        debug!("prefetching question for '{}'", pair.term());
        let handle = tokio::spawn(async move { builder.build(&pair).await });
        Self { handle }
    }

    /// Non-blocking readiness check. Never consumes the result; callable any
    /// number of times.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the build to finish and take its result.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Prefetch` when the background task panicked, or
    /// whatever error the build itself produced.
    pub async fn join(self) -> Result<Question, QuizError> {
        self.handle.await?
    }
}
