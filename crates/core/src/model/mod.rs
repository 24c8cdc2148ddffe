mod pair;
mod question;

pub use pair::VocabPair;
pub use question::{Mistake, Question, QuestionError, OPTION_COUNT};
