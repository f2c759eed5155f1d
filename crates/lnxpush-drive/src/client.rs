//! Drive API client
//!
//! Provides a typed HTTP client for the Drive v3 REST surface this adapter
//! needs: the `about` probe and the multipart file upload. Handles
//! authentication headers, JSON deserialization, and endpoint construction.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lnxpush_drive::client::DriveClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DriveClient::new("access-token-here");
//! let about = client.about().await?;
//! println!("Connected as {:?}", about.user);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::DriveApiError;

/// Base URL for the Drive v3 API
const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Base URL for the Drive v3 upload endpoint
const DRIVE_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// Request timeout for metadata API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Request timeout for uploads, which may carry large bodies
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Boundary marker for multipart/related upload bodies
const MULTIPART_BOUNDARY: &str = "lnxpush-upload-boundary";

// ============================================================================
// Drive API response types
// ============================================================================

/// Response from the `about` endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutResponse {
    /// The authenticated user, when the `user` field was requested
    pub user: Option<DriveUser>,
}

/// The authenticated user's profile
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveUser {
    /// Display name
    pub display_name: Option<String>,
    /// Email address
    pub email_address: Option<String>,
}

/// A file resource returned by the upload endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// Provider-assigned file id
    pub id: String,
    /// File name
    pub name: Option<String>,
}

// ============================================================================
// DriveClient
// ============================================================================

/// HTTP client for Drive API calls
///
/// Wraps `reqwest::Client` with bearer authentication and base URL
/// construction. Base URLs are overridable for tests against a mock server.
pub struct DriveClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for metadata requests
    base_url: String,
    /// Base URL for upload requests
    upload_base_url: String,
    /// Current OAuth2 access token
    access_token: String,
}

impl DriveClient {
    /// Creates a client against the production API
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_urls(access_token, DRIVE_BASE_URL, DRIVE_UPLOAD_BASE_URL)
    }

    /// Creates a client with explicit base URLs (used by tests)
    pub fn with_base_urls(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            upload_base_url: upload_base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Probes the API with an `about` request
    ///
    /// This is the cheapest authenticated call the API offers, used by the
    /// connection adapter to validate the access token.
    pub async fn about(&self) -> Result<AboutResponse, DriveApiError> {
        let url = format!("{}/about?fields=user", self.base_url);
        debug!(%url, "Probing drive API");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(DriveApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<AboutResponse>()
            .await
            .map_err(|e| DriveApiError::Decode(e.to_string()))
    }

    /// Uploads file content into a folder using a multipart/related request
    ///
    /// The metadata part names the file and its parent folder; the media
    /// part carries the raw bytes.
    pub async fn upload_multipart(
        &self,
        file_title: &str,
        folder_id: &str,
        content: Vec<u8>,
    ) -> Result<DriveFile, DriveApiError> {
        let url = format!(
            "{}/files?uploadType=multipart&fields=id,name",
            self.upload_base_url
        );

        let metadata = serde_json::json!({
            "name": file_title,
            "parents": [folder_id],
        });

        let body = multipart_related_body(&metadata.to_string(), &content);

        debug!(%url, file_title, folder_id, bytes = content.len(), "Uploading file");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .timeout(UPLOAD_TIMEOUT)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(DriveApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<DriveFile>()
            .await
            .map_err(|e| DriveApiError::Decode(e.to_string()))
    }
}

/// Builds a multipart/related body with a JSON metadata part and a binary
/// media part
fn multipart_related_body(metadata_json: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(metadata_json.len() + content.len() + 256);

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata_json.as_bytes());
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_urls_are_trimmed() {
        let client = DriveClient::with_base_urls("token", "http://localhost:1/", "http://localhost:2/");
        assert_eq!(client.base_url, "http://localhost:1");
        assert_eq!(client.upload_base_url, "http://localhost:2");
    }

    #[test]
    fn test_multipart_body_layout() {
        let body = multipart_related_body(r#"{"name":"log.csv"}"#, b"a,b,c");
        let text = String::from_utf8_lossy(&body);

        assert!(text.starts_with(&format!("--{MULTIPART_BOUNDARY}\r\n")));
        assert!(text.contains(r#"{"name":"log.csv"}"#));
        assert!(text.contains("a,b,c"));
        assert!(text.ends_with(&format!("--{MULTIPART_BOUNDARY}--\r\n")));

        // Metadata part precedes the media part
        let meta_pos = text.find("application/json").unwrap();
        let media_pos = text.find("application/octet-stream").unwrap();
        assert!(meta_pos < media_pos);
    }
}
