use secrecy::{ExposeSecret, SecretString};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Credentials of the signed-in user, handed to the HTTP layer at construction.
#[derive(Clone, Debug)]
pub struct AuthSession {
    token: SecretString,
    display_name: Option<String>,
}

impl AuthSession {
    pub fn new(token: SecretString, display_name: Option<String>) -> AppResult<Self> {
        if token.expose_secret().trim().is_empty() {
            return Err(AppError::Unauthorized(
                "Bearer token must not be empty".to_string(),
            ));
        }
        Ok(Self {
            token,
            display_name,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(config.api_token.clone(), config.display_name.clone())
    }

    pub fn bearer_token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Student")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_config() {
        let session = AuthSession::from_config(&Config::test_config()).unwrap();

        assert_eq!(session.bearer_token(), "test_token");
        assert_eq!(session.display_name(), "Test Student");
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let result = AuthSession::new(SecretString::from("   ".to_string()), None);

        match result {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("token")),
            _ => panic!("Expected Unauthorized error"),
        }
    }

    #[test]
    fn test_debug_output_redacts_token() {
        let session = AuthSession::new(SecretString::from("s3cr3t".to_string()), None).unwrap();

        assert!(!format!("{:?}", session).contains("s3cr3t"));
        assert_eq!(session.display_name(), "Student");
    }
}
