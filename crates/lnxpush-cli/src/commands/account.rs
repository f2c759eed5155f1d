//! Account management commands
//!
//! Accounts are registered directly in the shared database; the daemon
//! picks a new account up on its next check (it re-resolves on every
//! attempt, so no restart is needed).

use anyhow::{Context, Result};
use clap::Subcommand;

use lnxpush_core::config::Config;
use lnxpush_store::{DatabasePool, SqliteAccountDirectory};

use crate::commands::database_path;
use crate::output::{get_formatter, OutputFormat};

/// Manage sync accounts
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Register an account (e.g. your drive e-mail address)
    Add {
        /// Account name
        name: String,
    },
    /// List registered accounts
    List,
    /// Remove a registered account
    Remove {
        /// Account name
        name: String,
    },
}

impl AccountCommand {
    /// Execute the selected account subcommand
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let config = Config::load_or_default(&Config::default_path());
        let pool = DatabasePool::new(&database_path())
            .await
            .context("Failed to open database")?;
        // Management always works; the enumeration gate only applies to the
        // daemon's account lookups.
        let directory = SqliteAccountDirectory::new(pool.pool().clone(), true);

        match self {
            AccountCommand::Add { name } => {
                let account = directory
                    .add_account(name, &config.account.kind)
                    .await
                    .context("Failed to register account")?;
                formatter.success(&format!("Account '{}' registered", account.name()));
                formatter.print_json(&serde_json::json!({
                    "id": account.id().to_string(),
                    "name": account.name(),
                    "kind": account.kind(),
                }));
            }
            AccountCommand::List => {
                let accounts = directory.list_all().await.context("Failed to list accounts")?;

                if matches!(format, OutputFormat::Json) {
                    let json: Vec<serde_json::Value> = accounts
                        .iter()
                        .map(|a| {
                            serde_json::json!({
                                "id": a.id().to_string(),
                                "name": a.name(),
                                "kind": a.kind(),
                                "syncable": a.is_syncable(),
                                "auto_sync": a.auto_sync(),
                            })
                        })
                        .collect();
                    formatter.print_json(&serde_json::Value::Array(json));
                } else if accounts.is_empty() {
                    formatter.info("No accounts registered");
                } else {
                    for account in accounts {
                        let sync_marker = if account.is_syncable() { "sync on" } else { "sync off" };
                        formatter.info(&format!(
                            "{} ({}, {})",
                            account.name(),
                            account.kind(),
                            sync_marker
                        ));
                    }
                }
            }
            AccountCommand::Remove { name } => {
                directory
                    .remove_account(name, &config.account.kind)
                    .await
                    .context("Failed to remove account")?;
                formatter.success(&format!("Account '{}' removed", name));
            }
        }

        Ok(())
    }
}
