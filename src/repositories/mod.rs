pub mod attempt_repository;
pub mod quiz_repository;

pub use attempt_repository::{AttemptRepository, HttpAttemptRepository};
pub use quiz_repository::{HttpQuizRepository, QuizRepository};
