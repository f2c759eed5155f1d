//! Preference store port (driven/secondary port)
//!
//! Simple key-value persistence for the sync target parameters. Values are
//! strings defaulting to empty; writes are rare (folder pick, explicit
//! sync-to-folder) and last-writer-wins is acceptable.

use crate::domain::params::SyncParameters;

/// Well-known preference keys
pub mod keys {
    /// Cloud folder the upload lands in
    pub const FOLDER_ID: &str = "sync.folder_id";
    /// Title the uploaded file gets
    pub const FILE_TITLE: &str = "sync.file_title";
    /// Local file path to upload
    pub const LOCAL_FILE_PATH: &str = "sync.local_file_path";
}

/// Port trait for key-value preference persistence
#[async_trait::async_trait]
pub trait IPreferenceStore: Send + Sync {
    /// Returns the stored value for `key`, or `None` if absent
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removes `key` if present
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Loads the stored sync parameters, with absent keys as empty strings
pub async fn load_stored_parameters(
    store: &dyn IPreferenceStore,
) -> anyhow::Result<SyncParameters> {
    Ok(SyncParameters {
        folder_id: store.get(keys::FOLDER_ID).await?.unwrap_or_default(),
        file_title: store.get(keys::FILE_TITLE).await?.unwrap_or_default(),
        local_file_path: store
            .get(keys::LOCAL_FILE_PATH)
            .await?
            .unwrap_or_default(),
    })
}

/// Persists every non-empty field of `params`
///
/// Empty fields are left alone so a partial update (e.g. a folder pick)
/// never erases the stored title or path.
pub async fn store_parameters(
    store: &dyn IPreferenceStore,
    params: &SyncParameters,
) -> anyhow::Result<()> {
    if !params.folder_id.is_empty() {
        store.set(keys::FOLDER_ID, &params.folder_id).await?;
    }
    if !params.file_title.is_empty() {
        store.set(keys::FILE_TITLE, &params.file_title).await?;
    }
    if !params.local_file_path.is_empty() {
        store
            .set(keys::LOCAL_FILE_PATH, &params.local_file_path)
            .await?;
    }
    Ok(())
}
