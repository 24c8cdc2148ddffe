#![forbid(unsafe_code)]

pub mod model;
pub mod time;
pub mod wordlist;

pub use model::{Mistake, Question, QuestionError, VocabPair};
pub use time::Clock;
