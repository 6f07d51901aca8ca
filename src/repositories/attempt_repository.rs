use async_trait::async_trait;
use validator::Validate;

use crate::{
    errors::AppResult,
    http::ApiClient,
    models::{
        domain::{Attempt, AttemptResult},
        dto::{request::SaveProgressRequest, response::AttemptEnvelope},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    async fn find_by_id(&self, attempt_id: &str) -> AppResult<Attempt>;
    async fn save_progress(
        &self,
        attempt_id: &str,
        request: &SaveProgressRequest,
    ) -> AppResult<()>;
    async fn submit(&self, attempt_id: &str) -> AppResult<()>;
    async fn find_result(&self, attempt_id: &str) -> AppResult<AttemptResult>;
}

pub struct HttpAttemptRepository {
    api: ApiClient,
}

impl HttpAttemptRepository {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }
}

#[async_trait]
impl AttemptRepository for HttpAttemptRepository {
    async fn find_by_id(&self, attempt_id: &str) -> AppResult<Attempt> {
        let envelope: AttemptEnvelope = self
            .api
            .get_json(&["attempts", attempt_id])
            .await?;
        Attempt::try_from(envelope.attempt)
    }

    async fn save_progress(
        &self,
        attempt_id: &str,
        request: &SaveProgressRequest,
    ) -> AppResult<()> {
        request.validate()?;
        self.api
            .put_ack(&["attempts", attempt_id, "save"], request)
            .await
    }

    async fn submit(&self, attempt_id: &str) -> AppResult<()> {
        self.api.post_ack(&["attempts", attempt_id, "submit"]).await
    }

    async fn find_result(&self, attempt_id: &str) -> AppResult<AttemptResult> {
        let envelope: AttemptEnvelope = self
            .api
            .get_json(&["attempts", attempt_id, "result"])
            .await?;
        AttemptResult::try_from(envelope.attempt)
    }
}
