//! Status command - query the running daemon

use anyhow::{Context, Result};
use clap::Args;

use crate::commands::sync::connect;
use crate::output::{get_formatter, OutputFormat};

/// Show daemon status
#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    /// Queries the daemon over D-Bus and prints its status
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let proxy = match connect().await {
            Ok(proxy) => proxy,
            Err(e) => {
                formatter.error(&format!("{e:#}"));
                formatter.info("Is the daemon running? Start it with: lnxpush daemon start");
                return Ok(());
            }
        };

        let status_json = proxy.get_status().await.context("GetStatus call failed")?;
        let status: serde_json::Value =
            serde_json::from_str(&status_json).context("Daemon returned malformed status")?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&status);
            return Ok(());
        }

        let state = status["state"].as_str().unwrap_or("unknown");
        match status["account"].as_str() {
            Some(account) => {
                formatter.success(&format!("Daemon is {} (account: {})", state, account));
            }
            None => {
                formatter.success(&format!("Daemon is {}", state));
                if state == "waiting_for_account" {
                    formatter.info("Register an account with: lnxpush account add <name>");
                }
            }
        }

        Ok(())
    }
}
