use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

use crate::{
    auth::AuthSession,
    config::Config,
    errors::{AppError, AppResult, ErrorBody},
};

/// JSON-over-HTTP client bound to the API base URL and the signed-in user.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: AuthSession,
}

impl ApiClient {
    pub fn connect(config: &Config, session: AuthSession) -> AppResult<Self> {
        Self::new(&config.api_base_url, session, config.request_timeout())
    }

    pub fn new(base_url: &str, session: AuthSession, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::ValidationError(format!(
                "API base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// Appends `segments` to the base path, each one percent-encoded, so an id
    /// containing `/` stays a single segment.
    pub fn url(&self, segments: &[&str]) -> AppResult<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(AppError::ValidationError(format!(
                "invalid path segment '{}'",
                bad
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::ValidationError("API base URL cannot carry a path".to_string())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> AppResult<T> {
        let response = self.send(self.client.get(self.url(segments)?)).await?;
        Self::read_json(response).await
    }

    pub async fn post_json<T: DeserializeOwned>(&self, segments: &[&str]) -> AppResult<T> {
        let response = self.send(self.client.post(self.url(segments)?)).await?;
        Self::read_json(response).await
    }

    /// POST without a body; any 2xx counts as acknowledged.
    pub async fn post_ack(&self, segments: &[&str]) -> AppResult<()> {
        self.send(self.client.post(self.url(segments)?)).await?;
        Ok(())
    }

    /// PUT a JSON body; any 2xx counts as acknowledged.
    pub async fn put_ack<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> AppResult<()> {
        self.send(self.client.put(self.url(segments)?).json(body)).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        log::debug!("API responded {} for {}", status, text);

        Err(AppError::from_status(status, body.message))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
