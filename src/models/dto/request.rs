use serde::Serialize;
use validator::Validate;

use crate::models::domain::AnswerMap;

/// Body of `PUT /attempts/{id}/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct SaveProgressRequest {
    #[validate(length(min = 1, message = "nothing to save"))]
    pub answers: Vec<AnswerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: String,
    pub selected_option: usize,
}

impl From<&AnswerMap> for SaveProgressRequest {
    fn from(answers: &AnswerMap) -> Self {
        SaveProgressRequest {
            answers: answers.to_entries(),
        }
    }
}
