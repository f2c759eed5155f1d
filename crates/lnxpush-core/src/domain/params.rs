//! Sync target parameters
//!
//! [`SyncParameters`] is the {folder, title, path} triple a sync attempt
//! operates on. Fields arrive from a trigger payload and are completed
//! field-by-field from the preference store; a non-empty payload field is
//! never overwritten by a stored value.

use serde::{Deserialize, Serialize};

use super::errors::AttemptError;
use super::newtypes::FolderId;

/// Target parameters for one sync attempt
///
/// Empty strings mean "not provided". An empty `folder_id` routes the
/// attempt to folder selection instead of upload; empty `file_title` or
/// `local_file_path` after fallback is a configuration error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncParameters {
    /// Cloud folder to upload into; empty until a folder has been picked
    pub folder_id: String,
    /// Title the uploaded file gets in the cloud
    pub file_title: String,
    /// Path of the local file to upload
    pub local_file_path: String,
}

impl SyncParameters {
    /// Creates parameters from explicit values
    pub fn new(
        folder_id: impl Into<String>,
        file_title: impl Into<String>,
        local_file_path: impl Into<String>,
    ) -> Self {
        Self {
            folder_id: folder_id.into(),
            file_title: file_title.into(),
            local_file_path: local_file_path.into(),
        }
    }

    /// Creates an all-empty parameter set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fills each empty field from `fallback`, leaving non-empty fields
    /// untouched
    ///
    /// This is field-level fallback, never a whole-record override: a
    /// trigger that carries only a folder id still picks up the stored
    /// title and path, and a stored folder id never clobbers an explicit
    /// one from the payload.
    pub fn fill_missing_from(&mut self, fallback: &SyncParameters) {
        if self.folder_id.is_empty() {
            self.folder_id = fallback.folder_id.clone();
        }
        if self.file_title.is_empty() {
            self.file_title = fallback.file_title.clone();
        }
        if self.local_file_path.is_empty() {
            self.local_file_path = fallback.local_file_path.clone();
        }
    }

    /// Returns true when no target folder is known yet
    pub fn needs_folder_selection(&self) -> bool {
        self.folder_id.is_empty()
    }

    /// Validates that both required target fields are present
    ///
    /// # Errors
    /// `AttemptError::MissingParameters` naming the first empty field.
    pub fn require_target(&self) -> Result<(), AttemptError> {
        if self.file_title.is_empty() {
            return Err(AttemptError::MissingParameters {
                field: "file_title",
            });
        }
        if self.local_file_path.is_empty() {
            return Err(AttemptError::MissingParameters {
                field: "local_file_path",
            });
        }
        Ok(())
    }

    /// Returns the folder id as a validated [`FolderId`]
    ///
    /// Only meaningful once [`needs_folder_selection`](Self::needs_folder_selection)
    /// is false.
    pub fn folder(&self) -> Result<FolderId, AttemptError> {
        FolderId::new(self.folder_id.clone()).map_err(|_| AttemptError::MissingParameters {
            field: "folder_id",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_missing_substitutes_only_empty_fields() {
        let mut params = SyncParameters::new("", "report.csv", "");
        let stored = SyncParameters::new("F-stored", "stored.csv", "/data/stored.csv");

        params.fill_missing_from(&stored);

        assert_eq!(params.folder_id, "F-stored");
        assert_eq!(params.file_title, "report.csv");
        assert_eq!(params.local_file_path, "/data/stored.csv");
    }

    #[test]
    fn test_fill_missing_never_overrides_nonempty() {
        let mut params = SyncParameters::new("F1", "log.csv", "/data/log.csv");
        let stored = SyncParameters::new("F2", "other.csv", "/tmp/other.csv");

        params.fill_missing_from(&stored);

        assert_eq!(params, SyncParameters::new("F1", "log.csv", "/data/log.csv"));
    }

    #[test]
    fn test_fill_missing_from_empty_store_is_noop() {
        let mut params = SyncParameters::new("", "log.csv", "");
        params.fill_missing_from(&SyncParameters::empty());
        assert_eq!(params, SyncParameters::new("", "log.csv", ""));
    }

    #[test]
    fn test_needs_folder_selection() {
        assert!(SyncParameters::new("", "a", "b").needs_folder_selection());
        assert!(!SyncParameters::new("F1", "a", "b").needs_folder_selection());
    }

    #[test]
    fn test_require_target_names_first_missing_field() {
        let err = SyncParameters::new("F1", "", "").require_target().unwrap_err();
        assert_eq!(
            err,
            AttemptError::MissingParameters {
                field: "file_title"
            }
        );

        let err = SyncParameters::new("F1", "log.csv", "")
            .require_target()
            .unwrap_err();
        assert_eq!(
            err,
            AttemptError::MissingParameters {
                field: "local_file_path"
            }
        );

        assert!(SyncParameters::new("F1", "log.csv", "/data/log.csv")
            .require_target()
            .is_ok());
    }

    #[test]
    fn test_folder_accessor() {
        let params = SyncParameters::new("F1", "log.csv", "/data/log.csv");
        assert_eq!(params.folder().unwrap().as_str(), "F1");

        assert!(SyncParameters::empty().folder().is_err());
    }
}
