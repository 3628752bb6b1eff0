//! System operations: external tool discovery and opening files

use std::path::Path;

use tokio::process::Command;
use tracing::{info, warn};

/// External tools the reminder relies on, with a harmless invocation each
const REQUIRED_TOOLS: &[(&str, &[&str])] = &[
    ("xprintidle", &[]),
    ("pacmd", &["--version"]),
    ("xwininfo", &["-version"]),
    ("aplay", &["--version"]),
];

/// Check which external tools are installed.
///
/// Missing tools are not fatal, the matching condition check fails open.
/// Returns the names of the missing tools.
pub async fn check_tools_available() -> Vec<&'static str> {
    let mut missing = Vec::new();

    for (tool, args) in REQUIRED_TOOLS {
        match Command::new(tool).args(*args).output().await {
            Ok(_) => info!("{} is available", tool),
            Err(e) => {
                warn!("{} is not available ({}), related checks will be skipped", tool, e);
                missing.push(*tool);
            }
        }
    }

    missing
}

/// Open a file with the desktop's default application
pub async fn open_with_default_app(path: &Path) -> Result<(), String> {
    info!("Opening {}", path.display());

    let output = Command::new("xdg-open")
        .arg(path)
        .output()
        .await
        .map_err(|e| format!("Failed to execute xdg-open: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("xdg-open failed: {}", stderr));
    }

    Ok(())
}
