use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::domain::{AttemptSummary, QuizSummary};
use crate::models::dto::attempt_dto::AttemptDto;

/// `{ "attempt": { ... } }` wrapper used by the attempt endpoints.
#[derive(Debug, Deserialize)]
pub struct AttemptEnvelope {
    pub attempt: AttemptDto,
}

#[derive(Debug, Deserialize)]
pub struct StartAttemptResponse {
    pub attempt: AttemptRefDto,
}

#[derive(Debug, Deserialize)]
pub struct AttemptRefDto {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Body of `GET /my-quizzes`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyQuizzesResponse {
    #[serde(default)]
    pub official_quizzes: Vec<QuizListItemDto>,
    #[serde(default)]
    pub practice_quizzes: Vec<QuizListItemDto>,
    #[serde(default)]
    pub attempts: HashMap<String, AttemptSummaryDto>, // keyed by quiz id
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizListItemDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummaryDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: String,
    pub score: Option<u32>,
    pub total_questions: Option<u32>,
    pub percentage: Option<f64>,
}

impl TryFrom<AttemptSummaryDto> for AttemptSummary {
    type Error = AppError;

    fn try_from(dto: AttemptSummaryDto) -> Result<Self, Self::Error> {
        Ok(AttemptSummary {
            attempt_id: dto.id,
            status: dto.status.parse()?,
            score: dto.score,
            total_questions: dto.total_questions,
            percentage: dto.percentage,
        })
    }
}

impl TryFrom<MyQuizzesResponse> for Vec<QuizSummary> {
    type Error = AppError;

    fn try_from(mut dto: MyQuizzesResponse) -> Result<Self, Self::Error> {
        let official = dto.official_quizzes.into_iter().map(|q| (q, false));
        let practice = dto.practice_quizzes.into_iter().map(|q| (q, true));

        official
            .chain(practice)
            .map(|(quiz, practice)| {
                let attempt = dto
                    .attempts
                    .remove(&quiz.id)
                    .map(AttemptSummary::try_from)
                    .transpose()?;
                Ok::<_, AppError>(QuizSummary {
                    id: quiz.id,
                    title: quiz.title,
                    duration_minutes: quiz.duration,
                    practice,
                    attempt,
                })
            })
            .collect()
    }
}
