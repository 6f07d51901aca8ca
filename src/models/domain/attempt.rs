use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;
use crate::models::domain::{answer_map::AnswerMap, question::Question};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attempt {
    pub id: String,
    pub quiz_id: Option<String>,
    pub quiz_title: Option<String>,
    pub status: AttemptStatus,
    pub started_at: DateTime<Utc>, // server-assigned, never reset client-side
    pub duration_seconds: Option<i64>, // None when the quiz is untimed
    pub questions: Vec<AttemptQuestion>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptQuestion {
    pub question: Question,
    pub selected_option: Option<usize>,
    pub is_correct: Option<bool>, // only populated once graded
}

#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub enum AttemptStatus {
    InProgress,
    Submitted,
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptStatus::InProgress => write!(f, "in_progress"),
            AttemptStatus::Submitted => write!(f, "submitted"),
        }
    }
}

impl FromStr for AttemptStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(AttemptStatus::InProgress),
            "submitted" => Ok(AttemptStatus::Submitted),
            other => Err(AppError::ValidationError(format!(
                "Unknown attempt status '{}'",
                other
            ))),
        }
    }
}

impl Attempt {
    /// Answers already saved on the server, used to resume a session.
    pub fn saved_answers(&self) -> AnswerMap {
        self.questions
            .iter()
            .filter_map(|q| q.selected_option.map(|sel| (q.question.id.clone(), sel)))
            .collect()
    }

    pub fn is_submitted(&self) -> bool {
        self.status == AttemptStatus::Submitted
    }
}
