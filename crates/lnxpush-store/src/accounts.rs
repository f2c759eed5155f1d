//! SQLite implementation of IAccountDirectory
//!
//! Accounts registered with LNXPush live in the `accounts` table. The
//! platform accounts-permission maps to the `allow_enumeration` gate: when
//! it is off, the directory reports no capability and every
//! account-dependent operation fails closed.
//!
//! ## Type Mapping
//!
//! | Domain Type    | SQL Type | Strategy                                   |
//! |----------------|----------|--------------------------------------------|
//! | AccountId      | TEXT     | UUID string via `.to_string()` / `FromStr` |
//! | syncable flags | INTEGER  | 0 / 1                                      |
//! | DateTime<Utc>  | TEXT     | ISO 8601 via `to_rfc3339()`                |

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use lnxpush_core::domain::account::SyncAccount;
use lnxpush_core::domain::newtypes::AccountId;
use lnxpush_core::ports::account_directory::IAccountDirectory;

use crate::StoreError;

/// SQLite-based implementation of the account directory port
pub struct SqliteAccountDirectory {
    pool: SqlitePool,
    allow_enumeration: bool,
}

impl SqliteAccountDirectory {
    /// Creates a new directory over the given connection pool
    ///
    /// `allow_enumeration` is the capability gate from configuration;
    /// passing `false` makes every lookup fail closed.
    pub fn new(pool: SqlitePool, allow_enumeration: bool) -> Self {
        Self {
            pool,
            allow_enumeration,
        }
    }

    /// Registers a new account, or returns the existing one with the same
    /// name and kind
    pub async fn add_account(
        &self,
        name: &str,
        kind: &str,
    ) -> Result<SyncAccount, StoreError> {
        if let Some(existing) = self.find_account(name, kind).await? {
            return Ok(existing);
        }

        let account = SyncAccount::new(name, kind);
        sqlx::query(
            "INSERT INTO accounts (id, name, kind, syncable, auto_sync, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(account.id().to_string())
        .bind(account.name())
        .bind(account.kind())
        .bind(account.is_syncable() as i64)
        .bind(account.auto_sync() as i64)
        .bind(account.created_at().to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::info!(name, kind, "Account registered");
        Ok(account)
    }

    /// Looks up an account by name and kind
    pub async fn find_account(
        &self,
        name: &str,
        kind: &str,
    ) -> Result<Option<SyncAccount>, StoreError> {
        let row = sqlx::query("SELECT * FROM accounts WHERE name = ? AND kind = ?")
            .bind(name)
            .bind(kind)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| account_from_row(&r)).transpose()
    }

    /// Removes an account by name and kind; no-op if absent
    pub async fn remove_account(&self, name: &str, kind: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM accounts WHERE name = ? AND kind = ?")
            .bind(name)
            .bind(kind)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Lists every registered account regardless of kind
    pub async fn list_all(&self) -> Result<Vec<SyncAccount>, StoreError> {
        let rows = sqlx::query("SELECT * FROM accounts ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(account_from_row).collect()
    }
}

/// Maps an `accounts` row back to the domain entity
fn account_from_row(row: &SqliteRow) -> Result<SyncAccount, StoreError> {
    let id = AccountId::from_str(&row.get::<String, _>("id"))
        .map_err(|e| StoreError::SerializationError(e.to_string()))?;

    let created_at = DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))
        .map_err(|e| StoreError::SerializationError(format!("Invalid created_at: {e}")))?
        .with_timezone(&Utc);

    Ok(SyncAccount::with_id(
        id,
        row.get::<String, _>("name"),
        row.get::<String, _>("kind"),
        row.get::<i64, _>("syncable") != 0,
        row.get::<i64, _>("auto_sync") != 0,
        created_at,
    ))
}

#[async_trait::async_trait]
impl IAccountDirectory for SqliteAccountDirectory {
    async fn can_enumerate(&self) -> anyhow::Result<bool> {
        Ok(self.allow_enumeration)
    }

    async fn accounts_of_kind(&self, kind: &str) -> anyhow::Result<Vec<SyncAccount>> {
        // Insertion order; callers must not assume anything stronger.
        let rows = sqlx::query("SELECT * FROM accounts WHERE kind = ? ORDER BY rowid")
            .bind(kind)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(account_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn set_syncable(&self, id: &AccountId, syncable: bool) -> anyhow::Result<()> {
        sqlx::query("UPDATE accounts SET syncable = ? WHERE id = ?")
            .bind(syncable as i64)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        tracing::debug!(account_id = %id, syncable, "Account syncable flag updated");
        Ok(())
    }

    async fn set_auto_sync(&self, id: &AccountId, enabled: bool) -> anyhow::Result<()> {
        sqlx::query("UPDATE accounts SET auto_sync = ? WHERE id = ?")
            .bind(enabled as i64)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        tracing::debug!(account_id = %id, enabled, "Account auto_sync flag updated");
        Ok(())
    }
}
