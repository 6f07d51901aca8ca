use std::env;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: SecretString,
    pub display_name: Option<String>,
    pub autosave_debounce_secs: u64,
    pub tick_interval_ms: u64,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("LMS_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api".to_string()),
            api_token: SecretString::from(env::var("LMS_API_TOKEN").unwrap_or_default()),
            display_name: env::var("LMS_DISPLAY_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty()),
            autosave_debounce_secs: env::var("LMS_AUTOSAVE_DEBOUNCE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(15),
            tick_interval_ms: env::var("LMS_TICK_INTERVAL_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .unwrap_or(1000),
            request_timeout_secs: env::var("LMS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Rejects settings the client cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        Url::parse(&self.api_base_url)?;

        if self.api_token.expose_secret().trim().is_empty() {
            return Err(AppError::Unauthorized(
                "LMS_API_TOKEN is not set".to_string(),
            ));
        }
        if self.autosave_debounce_secs == 0 {
            return Err(AppError::ValidationError(
                "LMS_AUTOSAVE_DEBOUNCE_SECS must be greater than zero".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(AppError::ValidationError(
                "LMS_TICK_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn autosave_debounce(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.autosave_debounce_secs as i64)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3000/api".to_string(),
            api_token: SecretString::from("test_token".to_string()),
            display_name: Some("Test Student".to_string()),
            autosave_debounce_secs: 15,
            tick_interval_ms: 1000,
            request_timeout_secs: 5,
        }
    }
}
