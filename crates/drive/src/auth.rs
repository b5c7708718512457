//! Access tokens for the Drive API.

use crate::error::{DriveError, DriveResult};
use async_trait::async_trait;
use std::path::Path;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::ServiceAccountAuthenticator;

/// OAuth scopes requested for the service account.
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/drive.readonly",
];

/// Source of bearer tokens for Drive requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> DriveResult<String>;
}

/// Tokens minted from a service-account key file.
///
/// The authenticator caches tokens and refreshes them when they expire, so a
/// single instance is meant to live for the whole process.
pub struct ServiceAccountTokens {
    auth: DefaultAuthenticator,
}

impl ServiceAccountTokens {
    /// Read a service-account JSON key and build the authenticator.
    ///
    /// No network traffic happens here; the first token is fetched lazily.
    pub async fn from_key_file(path: &Path) -> DriveResult<Self> {
        let key = yup_oauth2::read_service_account_key(path)
            .await
            .map_err(|e| DriveError::Credentials(format!("{}: {e}", path.display())))?;

        let auth = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| DriveError::Credentials(e.to_string()))?;

        tracing::debug!(path = %path.display(), "service account authenticator ready");
        Ok(Self { auth })
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokens {
    async fn access_token(&self) -> DriveResult<String> {
        let token = self
            .auth
            .token(&SCOPES)
            .await
            .map_err(|e| DriveError::Auth(e.to_string()))?;

        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| DriveError::Auth("empty access token".to_string()))
    }
}

/// A fixed, already-issued bearer token.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> DriveResult<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token() {
        let provider = StaticToken::new("abc");
        assert_eq!(provider.access_token().await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_missing_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let result = ServiceAccountTokens::from_key_file(&path).await;
        match result {
            Err(DriveError::Credentials(message)) => {
                assert!(message.contains("missing.json"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[tokio::test]
    async fn test_malformed_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        std::fs::write(&path, "{\"type\": \"service_account\"").unwrap();

        let result = ServiceAccountTokens::from_key_file(&path).await;
        assert!(matches!(result, Err(DriveError::Credentials(_))));
    }
}
