use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;
use crate::models::domain::{
    Attempt, AttemptQuestion, AttemptResult, AttemptStatus, Question, QuestionOption,
    QuestionType,
};

/// Longest quiz the client will time: seven days.
pub const MAX_DURATION_MINUTES: i64 = 7 * 24 * 60;

/// Attempt as sent by `GET /attempts/{id}` and `GET /attempts/{id}/result`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDto {
    #[serde(rename = "_id")]
    #[validate(length(min = 1, message = "attempt id is empty"))]
    pub id: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub quiz: Option<QuizRefDto>,
    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<AttemptQuestionDto>,
    pub score: Option<u32>,
    pub total_questions: Option<u32>,
    pub percentage: Option<f64>,
}

/// The `quiz` field is either populated or a bare id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuizRefDto {
    Populated(QuizInfoDto),
    Id(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizInfoDto {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>, // minutes
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttemptQuestionDto {
    #[validate(nested)]
    pub question: QuestionDto,
    #[validate(range(min = -1, message = "selectedOption below -1"))]
    pub selected_option: Option<i64>,
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    #[serde(rename = "_id")]
    #[validate(length(min = 1, message = "question id is empty"))]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub question_type: String,
    #[serde(default)]
    pub options: Vec<OptionDto>,
    pub media_url: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDto {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl QuizRefDto {
    fn id(&self) -> Option<String> {
        match self {
            QuizRefDto::Populated(info) => info.id.clone(),
            QuizRefDto::Id(id) => Some(id.clone()),
        }
    }

    fn title(&self) -> Option<String> {
        match self {
            QuizRefDto::Populated(info) => info.title.clone(),
            QuizRefDto::Id(_) => None,
        }
    }

    /// `None` when untimed; durations beyond a week are rejected.
    fn duration_seconds(&self) -> Result<Option<i64>, AppError> {
        let minutes = match self {
            QuizRefDto::Populated(info) => info.duration.filter(|m| *m > 0),
            QuizRefDto::Id(_) => None,
        };
        let Some(minutes) = minutes else {
            return Ok(None);
        };
        if minutes > MAX_DURATION_MINUTES {
            return Err(AppError::ValidationError(format!(
                "quiz duration of {} minutes is out of range",
                minutes
            )));
        }
        Ok(Some(minutes * 60))
    }
}

impl TryFrom<QuestionDto> for Question {
    type Error = AppError;

    fn try_from(dto: QuestionDto) -> Result<Self, Self::Error> {
        Ok(Question {
            id: dto.id,
            content: dto.content,
            question_type: dto.question_type.parse()?,
            options: dto
                .options
                .into_iter()
                .map(|opt| QuestionOption {
                    text: opt.text,
                    is_correct: opt.is_correct,
                })
                .collect(),
            media_url: dto.media_url.filter(|url| !url.is_empty()),
            explanation: dto.explanation.filter(|text| !text.is_empty()),
        })
    }
}

impl TryFrom<AttemptQuestionDto> for AttemptQuestion {
    type Error = AppError;

    fn try_from(dto: AttemptQuestionDto) -> Result<Self, Self::Error> {
        let question = Question::try_from(dto.question)?;

        let selected_option = match dto.selected_option {
            None | Some(-1) => None,
            Some(index) => {
                let index = index as usize;
                if question.question_type == QuestionType::Mcq && index >= question.options.len()
                {
                    return Err(AppError::ValidationError(format!(
                        "selectedOption {} out of range for question '{}' with {} options",
                        index,
                        question.id,
                        question.options.len()
                    )));
                }
                Some(index)
            }
        };

        Ok(AttemptQuestion {
            question,
            selected_option,
            is_correct: dto.is_correct,
        })
    }
}

impl TryFrom<AttemptDto> for Attempt {
    type Error = AppError;

    fn try_from(dto: AttemptDto) -> Result<Self, Self::Error> {
        dto.validate()?;

        let status: AttemptStatus = dto.status.parse()?;
        let duration_seconds = match &dto.quiz {
            Some(quiz) => quiz.duration_seconds()?,
            None => None,
        };
        let questions = dto
            .questions
            .into_iter()
            .map(AttemptQuestion::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Attempt {
            id: dto.id,
            quiz_id: dto.quiz.as_ref().and_then(QuizRefDto::id),
            quiz_title: dto.quiz.as_ref().and_then(QuizRefDto::title),
            status,
            started_at: dto.started_at,
            duration_seconds,
            questions,
        })
    }
}

impl TryFrom<AttemptDto> for AttemptResult {
    type Error = AppError;

    fn try_from(dto: AttemptDto) -> Result<Self, Self::Error> {
        let missing = |field: &str| {
            AppError::ValidationError(format!("graded attempt is missing '{}'", field))
        };
        let score = dto.score.ok_or_else(|| missing("score"))?;
        let total_questions = dto.total_questions.ok_or_else(|| missing("totalQuestions"))?;
        let percentage = dto.percentage.ok_or_else(|| missing("percentage"))?;

        let attempt = Attempt::try_from(dto)?;
        if !attempt.is_submitted() {
            return Err(AppError::ValidationError(format!(
                "attempt '{}' has not been submitted",
                attempt.id
            )));
        }

        Ok(AttemptResult {
            attempt_id: attempt.id,
            quiz_title: attempt.quiz_title,
            score,
            total_questions,
            percentage,
            questions: attempt.questions,
        })
    }
}
