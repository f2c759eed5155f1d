//! Daemon management commands
//!
//! Provides the `lnxpush daemon` CLI subcommands for controlling the
//! LNXPush background service via systemd user units.
//!
//! # Subcommands
//!
//! - `start`   - Start the daemon service
//! - `stop`    - Stop the daemon service
//! - `status`  - Show daemon service status
//! - `restart` - Restart the daemon service

use std::process::Command;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Service unit name for the LNXPush daemon
const SYSTEMD_UNIT: &str = "lnxpush";

/// Manage the LNXPush background daemon
#[derive(Debug, Subcommand)]
pub enum DaemonCommand {
    /// Start the LNXPush daemon
    Start,
    /// Stop the LNXPush daemon
    Stop,
    /// Show daemon service status
    Status,
    /// Restart the LNXPush daemon
    Restart,
}

impl DaemonCommand {
    /// Execute the selected daemon subcommand
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        match self {
            DaemonCommand::Start => systemctl_action("start", "started", format),
            DaemonCommand::Stop => systemctl_action("stop", "stopped", format),
            DaemonCommand::Restart => systemctl_action("restart", "restarted", format),
            DaemonCommand::Status => daemon_status(format),
        }
    }
}

/// Runs `systemctl --user <action> lnxpush` and reports the result
fn systemctl_action(action: &str, past_tense: &str, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(matches!(format, OutputFormat::Json));

    info!(action, "Controlling LNXPush daemon via systemctl");

    let output = Command::new("systemctl")
        .args(["--user", action, SYSTEMD_UNIT])
        .output()
        .context("Failed to execute systemctl. Is systemd available?")?;

    if output.status.success() {
        formatter.success(&format!("LNXPush daemon {}", past_tense));
        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "action": action,
                "success": true,
            }));
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        formatter.error(&format!("Failed to {} daemon: {}", action, stderr.trim()));
        unit_hint(&stderr, formatter.as_ref());

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "action": action,
                "success": false,
                "error": stderr.trim(),
            }));
        }
    }

    Ok(())
}

/// Shows the daemon service status via systemctl
fn daemon_status(format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(matches!(format, OutputFormat::Json));

    let output = Command::new("systemctl")
        .args(["--user", "status", SYSTEMD_UNIT])
        .output()
        .context("Failed to execute systemctl. Is systemd available?")?;

    let stdout = String::from_utf8_lossy(&output.stdout);

    let is_active = stdout.contains("active (running)");
    let is_inactive = stdout.contains("inactive (dead)");
    let is_failed = stdout.contains("failed");

    let status_str = if is_active {
        "running"
    } else if is_failed {
        "failed"
    } else if is_inactive {
        "stopped"
    } else {
        "unknown"
    };

    if matches!(format, OutputFormat::Json) {
        formatter.print_json(&serde_json::json!({
            "action": "status",
            "status": status_str,
            "active": is_active,
            "details": stdout.trim(),
        }));
        return Ok(());
    }

    match status_str {
        "running" => formatter.success("LNXPush daemon is running"),
        "failed" => formatter.error("LNXPush daemon has failed"),
        "stopped" => formatter.info("LNXPush daemon is stopped"),
        _ => formatter.info("LNXPush daemon status is unknown"),
    }

    for line in stdout.lines() {
        formatter.info(line);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        // systemctl status exits non-zero for inactive services; only hint
        // when the unit is genuinely missing
        unit_hint(&stderr, formatter.as_ref());
    }

    Ok(())
}

/// Prints installation hints when the systemd unit is missing
fn unit_hint(stderr: &str, formatter: &dyn OutputFormatter) {
    if stderr.contains("not found") || stderr.contains("No such file") {
        formatter.info("Hint: The systemd unit file may not be installed.");
        formatter.info("Copy config/lnxpush.service to ~/.config/systemd/user/lnxpush.service");
        formatter.info("Then run: systemctl --user daemon-reload");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_systemd_unit_name() {
        assert_eq!(SYSTEMD_UNIT, "lnxpush");
    }

    #[test]
    fn test_daemon_command_debug() {
        let cmd = DaemonCommand::Start;
        let debug = format!("{:?}", cmd);
        assert!(debug.contains("Start"));
    }
}
