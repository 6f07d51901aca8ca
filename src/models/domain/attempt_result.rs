use crate::models::domain::attempt::AttemptQuestion;

/// Server-graded attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct AttemptResult {
    pub attempt_id: String,
    pub quiz_title: Option<String>,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: f64,
    pub questions: Vec<AttemptQuestion>,
}
