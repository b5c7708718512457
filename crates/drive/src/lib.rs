//! # registro-drive
//!
//! Google Drive v3 client for whole-file transfers.
//!
//! Only the two calls the registro storage needs are exposed: download a
//! file's content and overwrite it. Requests carry a bearer token obtained
//! from a [`TokenProvider`].

mod auth;
mod error;

pub use auth::{ServiceAccountTokens, StaticToken, TokenProvider, SCOPES};
pub use error::{DriveError, DriveResult};

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Public endpoint of the Google APIs.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    message: String,
}

/// Client for the Drive v3 media endpoints.
pub struct DriveClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl DriveClient {
    /// Constructs a client against the public Drive API with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `DriveError::Request` if building the underlying HTTP client fails.
    pub fn new(tokens: Arc<dyn TokenProvider>) -> DriveResult<Self> {
        Self::with_timeout(tokens, DEFAULT_TIMEOUT_SECS)
    }

    /// Constructs a client with a custom per-request timeout.
    pub fn with_timeout(tokens: Arc<dyn TokenProvider>, timeout_secs: u64) -> DriveResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: DRIVE_API_BASE.to_string(),
            tokens,
        })
    }

    /// Point the client at another API root (a proxy or a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// `{base}/{segments...}/{file_id}`, with the id percent-encoded as a
    /// single path segment.
    fn file_url(&self, segments: &[&str], file_id: &str) -> DriveResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DriveError::Request(format!("invalid base url {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| DriveError::Request(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments)
            .push(file_id);
        Ok(url)
    }

    /// Download the full content of a file.
    ///
    /// Returns `Ok(None)` when Drive reports the file does not exist.
    pub async fn download(&self, file_id: &str) -> DriveResult<Option<Bytes>> {
        let mut url = self.file_url(&["drive", "v3", "files"], file_id)?;
        url.query_pairs_mut().append_pair("alt", "media");
        let token = self.tokens.access_token().await?;

        tracing::debug!(file_id, "downloading file");
        let response = self.client.get(url).bearer_auth(token).send().await?;

        let response = match check_status(response).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                tracing::debug!(file_id, "file not found");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let content = response.bytes().await?;
        tracing::debug!(file_id, bytes = content.len(), "download complete");
        Ok(Some(content))
    }

    /// Overwrite the content of an existing file.
    pub async fn upload(&self, file_id: &str, content: Vec<u8>, mime_type: &str) -> DriveResult<()> {
        let mut url = self.file_url(&["upload", "drive", "v3", "files"], file_id)?;
        url.query_pairs_mut().append_pair("uploadType", "media");
        let token = self.tokens.access_token().await?;

        tracing::debug!(file_id, bytes = content.len(), "uploading file");
        let response = self
            .client
            .patch(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, mime_type)
            .body(content)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-success response into `DriveError::Status`, keeping Google's
/// error message when the body carries one.
async fn check_status(response: Response) -> DriveResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown").to_string());

    Err(DriveError::Status {
        status: status.as_u16(),
        message,
    })
}
