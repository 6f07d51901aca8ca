use crate::models::domain::attempt::AttemptStatus;

#[derive(Clone, Debug, PartialEq)]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub duration_minutes: Option<i64>,
    pub practice: bool,
    pub attempt: Option<AttemptSummary>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttemptSummary {
    pub attempt_id: String,
    pub status: AttemptStatus,
    pub score: Option<u32>,
    pub total_questions: Option<u32>,
    pub percentage: Option<f64>,
}

/// What the quiz list offers for a quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizAction {
    Start,
    Continue { attempt_id: String },
    ViewResult { attempt_id: String },
}

impl QuizSummary {
    pub fn action(&self) -> QuizAction {
        match &self.attempt {
            None => QuizAction::Start,
            Some(a) if a.status == AttemptStatus::Submitted => QuizAction::ViewResult {
                attempt_id: a.attempt_id.clone(),
            },
            Some(a) => QuizAction::Continue {
                attempt_id: a.attempt_id.clone(),
            },
        }
    }
}
