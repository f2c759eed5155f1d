//! Attempt preparation use case
//!
//! Resolves the effective sync parameters for one attempt: the trigger
//! payload completed field-by-field from the preference store. Non-empty
//! payload fields always win; the store only fills gaps.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::domain::params::SyncParameters;
use crate::ports::preference_store::{load_stored_parameters, IPreferenceStore};

/// Use case for resolving effective sync parameters
pub struct PrepareAttemptUseCase {
    store: Arc<dyn IPreferenceStore>,
}

impl PrepareAttemptUseCase {
    /// Creates a new PrepareAttemptUseCase over the given store
    pub fn new(store: Arc<dyn IPreferenceStore>) -> Self {
        Self { store }
    }

    /// Completes `payload` from the preference store, field by field
    ///
    /// Called at Start and again once Connected: payload fields captured at
    /// Start may have been superseded by a pick or an explicit sync-to-folder
    /// in the meantime, so the fallback is re-applied to the original payload
    /// each time.
    pub async fn resolve_parameters(&self, payload: &SyncParameters) -> Result<SyncParameters> {
        let stored = load_stored_parameters(self.store.as_ref())
            .await
            .context("Failed to read stored sync parameters")?;

        let mut params = payload.clone();
        params.fill_missing_from(&stored);
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::ports::preference_store::keys;

    /// In-memory preference store fake
    #[derive(Default)]
    struct FakeStore {
        values: Mutex<HashMap<String, String>>,
    }

    impl FakeStore {
        fn with(entries: &[(&str, &str)]) -> Self {
            let store = Self::default();
            {
                let mut values = store.values.lock().unwrap();
                for (k, v) in entries {
                    values.insert((*k).to_string(), (*v).to_string());
                }
            }
            store
        }
    }

    #[async_trait::async_trait]
    impl IPreferenceStore for FakeStore {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> anyhow::Result<()> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_empty_payload_takes_all_stored_values() {
        let uc = PrepareAttemptUseCase::new(Arc::new(FakeStore::with(&[
            (keys::FOLDER_ID, "F-stored"),
            (keys::FILE_TITLE, "log.csv"),
            (keys::LOCAL_FILE_PATH, "/data/log.csv"),
        ])));

        let params = uc
            .resolve_parameters(&SyncParameters::empty())
            .await
            .unwrap();
        assert_eq!(
            params,
            SyncParameters::new("F-stored", "log.csv", "/data/log.csv")
        );
    }

    #[tokio::test]
    async fn test_payload_fields_take_precedence() {
        let uc = PrepareAttemptUseCase::new(Arc::new(FakeStore::with(&[
            (keys::FOLDER_ID, "F-stored"),
            (keys::FILE_TITLE, "stored.csv"),
            (keys::LOCAL_FILE_PATH, "/data/stored.csv"),
        ])));

        let payload = SyncParameters::new("F1", "log.csv", "/data/log.csv");
        let params = uc.resolve_parameters(&payload).await.unwrap();
        assert_eq!(params, payload);
    }

    #[tokio::test]
    async fn test_field_level_fallback_mixes_sources() {
        let uc = PrepareAttemptUseCase::new(Arc::new(FakeStore::with(&[
            (keys::FILE_TITLE, "stored.csv"),
            (keys::LOCAL_FILE_PATH, "/data/stored.csv"),
        ])));

        let payload = SyncParameters::new("F1", "", "");
        let params = uc.resolve_parameters(&payload).await.unwrap();
        assert_eq!(
            params,
            SyncParameters::new("F1", "stored.csv", "/data/stored.csv")
        );
    }

    #[tokio::test]
    async fn test_folder_stays_empty_when_nowhere_defined() {
        let uc = PrepareAttemptUseCase::new(Arc::new(FakeStore::with(&[
            (keys::FILE_TITLE, "log.csv"),
            (keys::LOCAL_FILE_PATH, "/data/log.csv"),
        ])));

        let params = uc
            .resolve_parameters(&SyncParameters::empty())
            .await
            .unwrap();
        assert!(params.needs_folder_selection());
        assert_eq!(params.file_title, "log.csv");
    }

    #[tokio::test]
    async fn test_absent_keys_resolve_to_empty() {
        let uc = PrepareAttemptUseCase::new(Arc::new(FakeStore::default()));
        let params = uc
            .resolve_parameters(&SyncParameters::empty())
            .await
            .unwrap();
        assert_eq!(params, SyncParameters::empty());
    }
}
