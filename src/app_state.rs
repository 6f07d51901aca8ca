use std::sync::Arc;

use crate::{
    auth::AuthSession,
    config::Config,
    errors::AppResult,
    http::ApiClient,
    repositories::{AttemptRepository, HttpAttemptRepository, HttpQuizRepository},
    services::{
        attempt_session::{AttemptSession, SessionSettings},
        clock::{Clock, SystemClock},
        quiz_service::QuizService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub attempt_repository: Arc<dyn AttemptRepository>,
    pub quiz_service: Arc<QuizService>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
    pub user: AuthSession,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        config.validate()?;

        let session = AuthSession::from_config(&config)?;
        let api = ApiClient::connect(&config, session)?;

        let attempt_repository = Arc::new(HttpAttemptRepository::new(&api));
        let quiz_repository = Arc::new(HttpQuizRepository::new(&api));
        let quiz_service = Arc::new(QuizService::new(quiz_repository));

        Ok(Self {
            attempt_repository,
            quiz_service,
            clock: Arc::new(SystemClock),
            config: Arc::new(config),
            user: api.session().clone(),
        })
    }

    /// A fresh, not yet loaded session for `attempt_id`.
    pub fn open_session(&self, attempt_id: &str) -> AttemptSession {
        AttemptSession::new(
            attempt_id,
            Arc::clone(&self.attempt_repository),
            Arc::clone(&self.clock),
            SessionSettings::from_config(&self.config),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::attempt_session::SessionState;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_open_session_starts_loading() {
        let state = AppState::new(Config::test_config()).unwrap();
        let session = state.open_session("a-1");

        assert_eq!(session.attempt_id(), "a-1");
        assert_eq!(session.state(), &SessionState::Loading);
        assert_eq!(state.user.display_name(), "Test Student");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::test_config();
        config.tick_interval_ms = 0;

        assert!(AppState::new(config).is_err());
    }
}
