use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{QuizAction, QuizSummary},
    repositories::QuizRepository,
};

/// Where opening a quiz from the list leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEntry {
    TakeAttempt { attempt_id: String },
    ReviewResult { attempt_id: String },
}

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_my_quizzes(&self) -> AppResult<Vec<QuizSummary>> {
        self.repository.list_my_quizzes().await
    }

    /// Starts a new attempt, or resumes the one in progress.
    pub async fn start_quiz(&self, quiz_id: &str) -> AppResult<String> {
        let attempt_id = self.repository.start_attempt(quiz_id).await?;
        log::info!("Quiz {} opened as attempt {}", quiz_id, attempt_id);
        Ok(attempt_id)
    }

    pub async fn enter(&self, quiz: &QuizSummary) -> AppResult<QuizEntry> {
        match quiz.action() {
            QuizAction::ViewResult { attempt_id } => Ok(QuizEntry::ReviewResult { attempt_id }),
            QuizAction::Start | QuizAction::Continue { .. } => {
                let attempt_id = self.start_quiz(&quiz.id).await?;
                Ok(QuizEntry::TakeAttempt { attempt_id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::AppError,
        models::domain::{AttemptStatus, AttemptSummary},
        repositories::quiz_repository::MockQuizRepository,
    };

    fn quiz(status: Option<AttemptStatus>) -> QuizSummary {
        QuizSummary {
            id: "quiz-1".to_string(),
            title: "Algebra".to_string(),
            duration_minutes: Some(30),
            practice: false,
            attempt: status.map(|status| AttemptSummary {
                attempt_id: "a-1".to_string(),
                status,
                score: None,
                total_questions: None,
                percentage: None,
            }),
        }
    }

    #[tokio::test]
    async fn test_submitted_quiz_goes_to_review_without_starting() {
        let mut mock = MockQuizRepository::new();
        mock.expect_start_attempt().times(0);
        let service = QuizService::new(Arc::new(mock));

        let entry = service
            .enter(&quiz(Some(AttemptStatus::Submitted)))
            .await
            .unwrap();

        assert_eq!(entry, QuizEntry::ReviewResult { attempt_id: "a-1".to_string() });
    }

    #[tokio::test]
    async fn test_in_progress_quiz_resumes_through_start_endpoint() {
        let mut mock = MockQuizRepository::new();
        mock.expect_start_attempt()
            .times(1)
            .returning(|_| Ok("a-1".to_string()));
        let service = QuizService::new(Arc::new(mock));

        let entry = service
            .enter(&quiz(Some(AttemptStatus::InProgress)))
            .await
            .unwrap();

        assert_eq!(entry, QuizEntry::TakeAttempt { attempt_id: "a-1".to_string() });
    }

    #[tokio::test]
    async fn test_start_failure_is_surfaced() {
        let mut mock = MockQuizRepository::new();
        mock.expect_start_attempt()
            .returning(|_| Err(AppError::ValidationError("Quiz is closed".to_string())));
        let service = QuizService::new(Arc::new(mock));

        let err = service.enter(&quiz(None)).await.unwrap_err();

        assert_eq!(err.user_message(), "Quiz is closed");
    }
}
