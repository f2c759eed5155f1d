//! Account resolution use case
//!
//! Obtains the single account a sync run operates under, gated by the
//! enumeration capability. Resolution happens fresh on every orchestration
//! attempt; results are never cached.

use std::sync::Arc;

use crate::config::AccountSelection;
use crate::domain::account::SyncAccount;
use crate::domain::errors::AccountError;
use crate::ports::account_directory::IAccountDirectory;

/// Use case for resolving the sync account
///
/// Fails closed when enumeration is not permitted, reports the absence of
/// any matching account, and applies the configured selection policy when
/// several match.
pub struct ResolveAccountUseCase {
    directory: Arc<dyn IAccountDirectory>,
    kind: String,
    selection: AccountSelection,
}

impl ResolveAccountUseCase {
    /// Creates a new ResolveAccountUseCase
    ///
    /// # Arguments
    /// * `directory` - Account directory port
    /// * `kind` - Provider kind accounts must match
    /// * `selection` - Policy for multiple matches
    pub fn new(
        directory: Arc<dyn IAccountDirectory>,
        kind: impl Into<String>,
        selection: AccountSelection,
    ) -> Self {
        Self {
            directory,
            kind: kind.into(),
            selection,
        }
    }

    /// Resolves the account to sync under
    ///
    /// # Errors
    ///
    /// - `AccountError::PermissionDenied` when enumeration is not permitted
    /// - `AccountError::NoAccountFound` when no account matches
    /// - `AccountError::MultipleAccounts` under the `require_single` policy
    /// - `AccountError::Lookup` when the directory itself fails
    pub async fn resolve(&self) -> Result<SyncAccount, AccountError> {
        let permitted = self
            .directory
            .can_enumerate()
            .await
            .map_err(|e| AccountError::Lookup(format!("{e:#}")))?;

        if !permitted {
            return Err(AccountError::PermissionDenied);
        }

        let mut accounts = self
            .directory
            .accounts_of_kind(&self.kind)
            .await
            .map_err(|e| AccountError::Lookup(format!("{e:#}")))?;

        match (accounts.len(), self.selection) {
            (0, _) => Err(AccountError::NoAccountFound),
            (1, _) => Ok(accounts.remove(0)),
            // Enumeration order is not guaranteed stable; first-found takes
            // whatever the directory returned first.
            (_, AccountSelection::FirstFound) => Ok(accounts.remove(0)),
            (n, AccountSelection::RequireSingle) => Err(AccountError::MultipleAccounts(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::newtypes::AccountId;

    /// In-memory directory fake with a configurable permission gate
    struct FakeDirectory {
        permitted: bool,
        accounts: Vec<SyncAccount>,
    }

    #[async_trait::async_trait]
    impl IAccountDirectory for FakeDirectory {
        async fn can_enumerate(&self) -> anyhow::Result<bool> {
            Ok(self.permitted)
        }

        async fn accounts_of_kind(&self, kind: &str) -> anyhow::Result<Vec<SyncAccount>> {
            Ok(self
                .accounts
                .iter()
                .filter(|a| a.kind() == kind)
                .cloned()
                .collect())
        }

        async fn set_syncable(&self, _id: &AccountId, _syncable: bool) -> anyhow::Result<()> {
            Ok(())
        }

        async fn set_auto_sync(&self, _id: &AccountId, _enabled: bool) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn usecase(
        permitted: bool,
        accounts: Vec<SyncAccount>,
        selection: AccountSelection,
    ) -> ResolveAccountUseCase {
        ResolveAccountUseCase::new(
            Arc::new(FakeDirectory {
                permitted,
                accounts,
            }),
            "drive",
            selection,
        )
    }

    #[tokio::test]
    async fn test_fails_closed_without_permission() {
        let uc = usecase(
            false,
            vec![SyncAccount::new("user@example.com", "drive")],
            AccountSelection::FirstFound,
        );
        assert_eq!(uc.resolve().await.unwrap_err(), AccountError::PermissionDenied);
    }

    #[tokio::test]
    async fn test_no_account_found() {
        let uc = usecase(true, vec![], AccountSelection::FirstFound);
        assert_eq!(uc.resolve().await.unwrap_err(), AccountError::NoAccountFound);
    }

    #[tokio::test]
    async fn test_other_kinds_do_not_match() {
        let uc = usecase(
            true,
            vec![SyncAccount::new("user@example.com", "dropbox")],
            AccountSelection::FirstFound,
        );
        assert_eq!(uc.resolve().await.unwrap_err(), AccountError::NoAccountFound);
    }

    #[tokio::test]
    async fn test_first_found_takes_enumeration_head() {
        let first = SyncAccount::new("first@example.com", "drive");
        let uc = usecase(
            true,
            vec![first.clone(), SyncAccount::new("second@example.com", "drive")],
            AccountSelection::FirstFound,
        );
        assert_eq!(uc.resolve().await.unwrap().name(), first.name());
    }

    #[tokio::test]
    async fn test_require_single_rejects_multiple() {
        let uc = usecase(
            true,
            vec![
                SyncAccount::new("a@example.com", "drive"),
                SyncAccount::new("b@example.com", "drive"),
            ],
            AccountSelection::RequireSingle,
        );
        assert_eq!(
            uc.resolve().await.unwrap_err(),
            AccountError::MultipleAccounts(2)
        );
    }

    #[tokio::test]
    async fn test_require_single_accepts_exactly_one() {
        let uc = usecase(
            true,
            vec![SyncAccount::new("only@example.com", "drive")],
            AccountSelection::RequireSingle,
        );
        assert_eq!(uc.resolve().await.unwrap().name(), "only@example.com");
    }
}
