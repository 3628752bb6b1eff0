//! System condition queries used to suppress reminders

use std::{collections::BTreeSet, future::Future, time::Duration};

use sysinfo::System;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::QueryError;

const IDLE_COMMAND: &str = "xprintidle";
const SOURCES_COMMAND: &str = "pacmd";
const WINDOWS_COMMAND: &str = "xwininfo";
const MICROPHONE_RUNNING_MARKER: &str = "state: RUNNING";

/// Queries the scheduler makes before showing a message
pub trait ConditionChecker {
    /// Whether the user has been idle for at least `threshold`
    fn is_idle(&self, threshold: Duration) -> impl Future<Output = Result<bool, QueryError>> + Send;

    /// Whether an audio input source is currently capturing
    fn is_microphone_active(&self) -> impl Future<Output = Result<bool, QueryError>> + Send;

    /// Whether any open window title contains one of `names`
    fn is_blacklisted_window_open(
        &self,
        names: &BTreeSet<String>,
    ) -> impl Future<Output = Result<bool, QueryError>> + Send;
}

/// Condition checker backed by X11 and PulseAudio command line tools
#[derive(Debug, Default, Clone)]
pub struct SystemConditions;

impl SystemConditions {
    pub fn new() -> Self {
        Self
    }

    /// Whether a process whose name contains one of `names` is running.
    ///
    /// Matching is case-insensitive. Not part of the suppression chain.
    pub fn is_blacklisted_process_running(&self, names: &BTreeSet<String>) -> bool {
        if names.is_empty() {
            return false;
        }

        let mut system = System::new();
        system.refresh_processes();
        let running = system.processes().values().map(|p| p.name().to_string());

        match find_blacklisted_process(running, names) {
            Some(name) => {
                info!("Blacklisted process running: {}", name);
                true
            }
            None => false,
        }
    }
}

impl ConditionChecker for SystemConditions {
    async fn is_idle(&self, threshold: Duration) -> Result<bool, QueryError> {
        let output = run_command(IDLE_COMMAND, &[]).await?;
        let idle_ms = parse_idle_millis(&output)?;
        debug!("System idle for {}ms", idle_ms);

        if u128::from(idle_ms) >= threshold.as_millis() {
            info!("System idle");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn is_microphone_active(&self) -> Result<bool, QueryError> {
        let output = run_command(SOURCES_COMMAND, &["list-sources"]).await?;
        if microphone_running(&output) {
            info!("Microphone active");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn is_blacklisted_window_open(&self, names: &BTreeSet<String>) -> Result<bool, QueryError> {
        if names.is_empty() {
            return Ok(false);
        }

        let listing = run_command(WINDOWS_COMMAND, &["-tree", "-root"]).await?;
        match find_blacklisted_window(&listing, names) {
            Some(name) => {
                info!("Blacklisted window running: {}", name);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Run a query command and return its stdout
async fn run_command(command: &'static str, args: &[&str]) -> Result<String, QueryError> {
    let output = Command::new(command)
        .args(args)
        .output()
        .await
        .map_err(|source| QueryError::Spawn { command, source })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(QueryError::Failed { command, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse the millisecond count printed by `xprintidle`
pub fn parse_idle_millis(output: &str) -> Result<u64, QueryError> {
    output
        .trim()
        .parse()
        .map_err(|_| QueryError::Unparseable {
            command: IDLE_COMMAND,
            output: output.to_string(),
        })
}

/// Whether `pacmd list-sources` output reports a running source
pub fn microphone_running(output: &str) -> bool {
    output.contains(MICROPHONE_RUNNING_MARKER)
}

/// First blacklisted name found in the window listing, case-sensitive
pub fn find_blacklisted_window<'a>(listing: &str, names: &'a BTreeSet<String>) -> Option<&'a str> {
    names
        .iter()
        .find(|name| listing.contains(name.as_str()))
        .map(String::as_str)
}

/// First blacklisted name matching a running process name, case-insensitive
pub fn find_blacklisted_process<'a, I>(running: I, names: &'a BTreeSet<String>) -> Option<&'a str>
where
    I: IntoIterator<Item = String>,
{
    let running: Vec<String> = running.into_iter().map(|n| n.to_lowercase()).collect();
    names
        .iter()
        .find(|name| {
            let needle = name.to_lowercase();
            running.iter().any(|process| process.contains(&needle))
        })
        .map(String::as_str)
}
