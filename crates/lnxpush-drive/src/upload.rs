//! Drive upload task adapter
//!
//! Implements the `IUploadTask` port: reads the local file and transfers it
//! into the target folder with a multipart upload. Fire-and-forget from the
//! orchestrator's perspective; completion and failure surface through this
//! task's logging.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use lnxpush_core::domain::newtypes::FolderId;
use lnxpush_core::ports::upload_task::{IUploadTask, ProgressFn};

use crate::auth::DriveAuthenticator;
use crate::client::DriveClient;

/// `IUploadTask` implementation over the drive HTTP API
pub struct DriveUploadTask {
    authenticator: Arc<DriveAuthenticator>,
    account_name: String,
    base_urls: Option<(String, String)>,
}

impl DriveUploadTask {
    /// Creates an upload task bound to `account_name` against the
    /// production API
    pub fn new(authenticator: Arc<DriveAuthenticator>, account_name: impl Into<String>) -> Self {
        Self {
            authenticator,
            account_name: account_name.into(),
            base_urls: None,
        }
    }

    /// Overrides the API base URLs (used by tests)
    pub fn with_base_urls(
        mut self,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
    ) -> Self {
        self.base_urls = Some((api_base.into(), upload_base.into()));
        self
    }
}

#[async_trait::async_trait]
impl IUploadTask for DriveUploadTask {
    async fn start(
        &self,
        file_title: &str,
        local_file_path: &Path,
        folder_id: &FolderId,
        progress: Option<ProgressFn>,
    ) -> anyhow::Result<()> {
        let tokens = self
            .authenticator
            .current_tokens(&self.account_name)
            .await?
            .context("No drive authorization available for upload")?;

        let content = tokio::fs::read(local_file_path)
            .await
            .with_context(|| format!("Failed to read {}", local_file_path.display()))?;
        let total = content.len() as u64;

        if let Some(ref report) = progress {
            report(0, total);
        }

        let client = match &self.base_urls {
            Some((api_base, upload_base)) => DriveClient::with_base_urls(
                tokens.access_token,
                api_base.clone(),
                upload_base.clone(),
            ),
            None => DriveClient::new(tokens.access_token),
        };

        let file = client
            .upload_multipart(file_title, folder_id.as_str(), content)
            .await?;

        if let Some(ref report) = progress {
            report(total, total);
        }

        info!(
            file_id = %file.id,
            file_title,
            folder = %folder_id,
            bytes = total,
            "Upload completed"
        );
        Ok(())
    }
}
