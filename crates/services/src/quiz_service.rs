use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;

use quiz_core::model::{Mistake, Question, VocabPair};
use quiz_core::time::Clock;

use crate::error::QuizError;
use crate::pair_pool::{MIN_PAIRS, PairPool};
use crate::prefetch::PrefetchJob;
use crate::question_builder::QuestionBuilder;
use crate::sentence_service::SentenceSource;

//
// ─── PRESENTATION-FACING TYPES ─────────────────────────────────────────────────
//

/// Observable quiz state, as the rendering layer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    NotStarted,
    AwaitingAnswer,
    ShowingFeedback,
    Finished,
}

/// Outcome of the most recently submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub chosen_meaning: String,
}

/// Position within a running quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub question_number: usize,
    pub answered: usize,
    pub total: usize,
}

/// What `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion,
    Finished,
}

/// Result of a finished (or aborted) quiz, kept until `reset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub total: usize,
    pub answered: usize,
    pub mistakes: Vec<Mistake>,
    pub aborted: bool,
}

impl QuizSummary {
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answered.saturating_sub(self.mistakes.len())
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

enum State {
    NotStarted,
    Running(Box<ActiveQuiz>),
    Finished(QuizSummary),
}

struct ActiveQuiz {
    pool: PairPool,
    builder: QuestionBuilder,
    current: Question,
    prefetch: Option<PrefetchJob>,
    question_number: usize,
    mistakes: Vec<Mistake>,
    feedback: Option<Feedback>,
    started_at: DateTime<Utc>,
}

impl ActiveQuiz {
    fn answered(&self) -> usize {
        self.question_number - 1 + usize::from(self.feedback.is_some())
    }

    fn into_summary(self, completed_at: DateTime<Utc>, aborted: bool) -> QuizSummary {
        let answered = self.answered();
        QuizSummary {
            started_at: self.started_at,
            // completed_at never precedes started_at, even if the wall clock
            // stepped back in between.
            completed_at: completed_at.max(self.started_at),
            total: self.pool.total(),
            answered,
            mistakes: self.mistakes,
            aborted,
        }
    }
}

//
// ─── QUIZ SERVICE ──────────────────────────────────────────────────────────────
//

/// The quiz progression state machine.
///
/// One foreground caller drives it; it is the only writer of session state.
/// While the user ponders the current question, the next one is already
/// being built on a background task, and `advance` hands the result over.
/// At most one such build is outstanding at any time, and a new one is only
/// started once the previous result has been adopted or discarded.
pub struct QuizService {
    source: Arc<dyn SentenceSource>,
    clock: Clock,
    state: State,
}

impl QuizService {
    #[must_use]
    pub fn new(source: Arc<dyn SentenceSource>) -> Self {
        Self {
            source,
            clock: Clock::default_clock(),
            state: State::NotStarted,
        }
    }

    /// Replace the clock, for deterministic session timestamps in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Begin a quiz over the given pairs.
    ///
    /// Builds the first question inline, since there is nothing to overlap
    /// it with, then immediately pops the next pair and starts its
    /// background build.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyStarted` unless the service is in its
    /// initial state, and `QuizError::InsufficientPairs` when fewer than
    /// five pairs are supplied; in both cases no quiz begins.
    pub async fn start(&mut self, pairs: Vec<VocabPair>) -> Result<(), QuizError> {
        if !matches!(self.state, State::NotStarted) {
            return Err(QuizError::AlreadyStarted);
        }

        let mut pool = PairPool::new(pairs)?;
        let builder = QuestionBuilder::new(pool.snapshot(), Arc::clone(&self.source));

        let Some(first) = pool.pop_unused() else {
            return Err(QuizError::InsufficientPairs {
                needed: MIN_PAIRS,
                found: 0,
            });
        };
        let current = builder.build(&first).await?;
        let prefetch = pool
            .pop_unused()
            .map(|pair| PrefetchJob::start(builder.clone(), pair));

        debug!("quiz started with {} pairs", pool.total());
        self.state = State::Running(Box::new(ActiveQuiz {
            pool,
            builder,
            current,
            prefetch,
            question_number: 1,
            mistakes: Vec::new(),
            feedback: None,
            started_at: self.clock.now(),
        }));
        Ok(())
    }

    /// Record the user's choice for the current question.
    ///
    /// A wrong choice is appended to the mistake history before anything
    /// else changes, so it can never be lost to a later transition. Neither
    /// the pool nor the outstanding prefetch is touched.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotRunning` outside a running quiz and
    /// `QuizError::AlreadyAnswered` when feedback for this question is
    /// already showing.
    pub fn submit_answer(&mut self, choice: impl Into<String>) -> Result<&Feedback, QuizError> {
        let State::Running(quiz) = &mut self.state else {
            return Err(QuizError::NotRunning);
        };
        if quiz.feedback.is_some() {
            return Err(QuizError::AlreadyAnswered);
        }

        let chosen = choice.into();
        let correct = quiz.current.is_correct(&chosen);
        if !correct {
            quiz.mistakes.push(Mistake {
                term: quiz.current.term().to_string(),
                correct_meaning: quiz.current.correct_meaning().to_string(),
                chosen_meaning: chosen.clone(),
            });
        }

        let feedback = quiz.feedback.insert(Feedback {
            correct,
            chosen_meaning: chosen,
        });
        Ok(&*feedback)
    }

    /// Move past the feedback screen: adopt the prefetched question, or
    /// finish the quiz when the pool ran dry.
    ///
    /// This is the only operation that can block, and only for however long
    /// the background build still needs. After adopting a question it pops
    /// the next pair (if any) and starts the next build.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotRunning` outside a running quiz,
    /// `QuizError::NoAnswer` when the current question has not been
    /// answered, and `QuizError::Prefetch` when the background build
    /// panicked.
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, QuizError> {
        let State::Running(quiz) = &mut self.state else {
            return Err(QuizError::NotRunning);
        };
        if quiz.feedback.is_none() {
            return Err(QuizError::NoAnswer);
        }

        match quiz.prefetch.take() {
            Some(job) => {
                let next = job.join().await?;
                quiz.current = next;
                quiz.question_number += 1;
                quiz.feedback = None;
                if let Some(pair) = quiz.pool.pop_unused() {
                    quiz.prefetch = Some(PrefetchJob::start(quiz.builder.clone(), pair));
                }
                Ok(AdvanceOutcome::NextQuestion)
            }
            None => {
                self.finish(false);
                Ok(AdvanceOutcome::Finished)
            }
        }
    }

    /// End the quiz immediately, from any state.
    ///
    /// An outstanding prefetch is dropped without being awaited; its task
    /// runs to completion in the background and the result is never read.
    pub fn abort(&mut self) {
        debug!("quiz aborted");
        self.finish(true);
    }

    /// Discard all session state and return to the initial state.
    pub fn reset(&mut self) {
        self.state = State::NotStarted;
    }

    fn finish(&mut self, aborted: bool) {
        let state = std::mem::replace(&mut self.state, State::NotStarted);
        let summary = match state {
            State::NotStarted => {
                let now = self.clock.now();
                QuizSummary {
                    started_at: now,
                    completed_at: now,
                    total: 0,
                    answered: 0,
                    mistakes: Vec::new(),
                    aborted,
                }
            }
            State::Running(quiz) => quiz.into_summary(self.clock.now(), aborted),
            State::Finished(summary) => summary,
        };
        self.state = State::Finished(summary);
    }

    //
    // ─── READ-ONLY ACCESSORS ───────────────────────────────────────────────
    //

    #[must_use]
    pub fn state(&self) -> QuizState {
        match &self.state {
            State::NotStarted => QuizState::NotStarted,
            State::Running(quiz) if quiz.feedback.is_some() => QuizState::ShowingFeedback,
            State::Running(_) => QuizState::AwaitingAnswer,
            State::Finished(_) => QuizState::Finished,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            State::Running(quiz) => Some(&quiz.current),
            _ => None,
        }
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        match &self.state {
            State::Running(quiz) => quiz.feedback.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Option<Progress> {
        match &self.state {
            State::Running(quiz) => Some(Progress {
                question_number: quiz.question_number,
                answered: quiz.answered(),
                total: quiz.pool.total(),
            }),
            _ => None,
        }
    }

    /// Wrong answers so far (or, once finished, of the whole quiz).
    #[must_use]
    pub fn mistakes(&self) -> &[Mistake] {
        match &self.state {
            State::NotStarted => &[],
            State::Running(quiz) => &quiz.mistakes,
            State::Finished(summary) => &summary.mistakes,
        }
    }

    #[must_use]
    pub fn summary(&self) -> Option<&QuizSummary> {
        match &self.state {
            State::Finished(summary) => Some(summary),
            _ => None,
        }
    }

    /// True when `advance` would not block: the upcoming question's build
    /// has finished, or the pool is exhausted and `advance` will finish the
    /// quiz.
    #[must_use]
    pub fn next_question_ready(&self) -> bool {
        match &self.state {
            State::Running(quiz) => quiz.prefetch.as_ref().map_or(true, PrefetchJob::is_ready),
            _ => false,
        }
    }
}

impl fmt::Debug for QuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizService")
            .field("state", &self.state())
            .field("progress", &self.progress())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
