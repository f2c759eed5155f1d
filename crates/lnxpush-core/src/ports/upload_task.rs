//! Upload task port (driven/secondary port)
//!
//! The actual file transfer is an external collaborator. The orchestrator
//! starts it and ends the sync attempt; transfer completion and failure are
//! the task's own contract, surfaced through its logging.

use std::path::Path;

use crate::domain::newtypes::FolderId;

/// Progress callback reporting `(bytes_sent, total_bytes)`
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Port trait for the upload transfer
#[async_trait::async_trait]
pub trait IUploadTask: Send + Sync {
    /// Transfers the local file into the given cloud folder
    ///
    /// # Arguments
    /// * `file_title` - Title the file gets in the cloud
    /// * `local_file_path` - Path of the local file to read
    /// * `folder_id` - Target folder
    /// * `progress` - Optional callback reporting `(bytes_sent, total_bytes)`
    async fn start(
        &self,
        file_title: &str,
        local_file_path: &Path,
        folder_id: &FolderId,
        progress: Option<ProgressFn>,
    ) -> anyhow::Result<()>;
}
