use async_trait::async_trait;

use crate::{
    errors::AppResult,
    http::ApiClient,
    models::{
        domain::QuizSummary,
        dto::response::{MyQuizzesResponse, StartAttemptResponse},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Starts an attempt, or returns the one already in progress.
    async fn start_attempt(&self, quiz_id: &str) -> AppResult<String>;
    async fn list_my_quizzes(&self) -> AppResult<Vec<QuizSummary>>;
}

pub struct HttpQuizRepository {
    api: ApiClient,
}

impl HttpQuizRepository {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }
}

#[async_trait]
impl QuizRepository for HttpQuizRepository {
    async fn start_attempt(&self, quiz_id: &str) -> AppResult<String> {
        let response: StartAttemptResponse = self
            .api
            .post_json(&["quizzes", quiz_id, "start"])
            .await?;
        Ok(response.attempt.id)
    }

    async fn list_my_quizzes(&self) -> AppResult<Vec<QuizSummary>> {
        let response: MyQuizzesResponse = self.api.get_json(&["my-quizzes"]).await?;
        response.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::AuthSession, config::Config, errors::AppError};
    use mockito::Server;
    use std::time::Duration;

    fn repository(server: &Server) -> HttpQuizRepository {
        let session = AuthSession::from_config(&Config::test_config()).unwrap();
        let api = ApiClient::new(&server.url(), session, Duration::from_secs(5)).unwrap();
        HttpQuizRepository::new(&api)
    }

    #[tokio::test]
    async fn test_start_attempt_returns_attempt_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/quizzes/quiz-1/start")
            .match_header("authorization", "Bearer test_token")
            .with_status(201)
            .with_body(r#"{"attempt":{"_id":"a-42","status":"in_progress"}}"#)
            .create_async()
            .await;

        let attempt_id = repository(&server).start_attempt("quiz-1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(attempt_id, "a-42");
    }

    #[tokio::test]
    async fn test_start_attempt_outside_window_surfaces_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/quizzes/quiz-1/start")
            .with_status(400)
            .with_body(r#"{"message":"Quiz is closed"}"#)
            .create_async()
            .await;

        let err = repository(&server).start_attempt("quiz-1").await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(err.user_message(), "Quiz is closed");
    }

    #[tokio::test]
    async fn test_list_my_quizzes_reads_both_lists() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/my-quizzes")
            .with_status(200)
            .with_body(
                r#"{"officialQuizzes":[{"_id":"quiz-1","title":"Algebra"}],
                    "practiceQuizzes":[{"_id":"quiz-2","title":"Drill"}],
                    "attempts":{}}"#,
            )
            .create_async()
            .await;

        let quizzes = repository(&server).list_my_quizzes().await.unwrap();

        assert_eq!(quizzes.len(), 2);
        assert_eq!(quizzes[1].title, "Drill");
        assert!(quizzes[1].practice);
    }
}
