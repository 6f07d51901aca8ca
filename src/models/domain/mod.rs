pub mod answer_map;
pub mod attempt;
pub mod attempt_result;
pub mod question;
pub mod quiz;
pub use answer_map::AnswerMap;
pub use attempt::{Attempt, AttemptQuestion, AttemptStatus};
pub use attempt_result::AttemptResult;
pub use question::{Question, QuestionOption, QuestionType};
pub use quiz::{AttemptSummary, QuizAction, QuizSummary};
