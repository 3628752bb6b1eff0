//! Start-with-session toggle backed by the installed desktop entry

use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::error::AutostartError;

pub const AUTOSTART_KEY: &str = "X-GNOME-Autostart-enabled";
pub const ICON_KEY: &str = "Icon";
const DESKTOP_ENTRY_GROUP: &str = "[Desktop Entry]";

/// Whether the application starts with the desktop session
pub trait Autostart {
    fn is_autostart_enabled(&self) -> Result<bool, AutostartError>;

    fn set_autostart_enabled(&self, enabled: bool) -> Result<(), AutostartError>;

    /// Flip the autostart flag and return the new value
    fn toggle_autostart(&self) -> Result<bool, AutostartError> {
        let enabled = !self.is_autostart_enabled()?;
        self.set_autostart_enabled(enabled)?;
        Ok(enabled)
    }
}

/// Autostart flag stored in a freedesktop `.desktop` file
#[derive(Debug, Clone)]
pub struct DesktopEntryAutostart {
    path: PathBuf,
}

impl DesktopEntryAutostart {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<String, AutostartError> {
        if !self.path.exists() {
            return Err(AutostartError::NotInstalled(self.path.clone()));
        }
        fs::read_to_string(&self.path).map_err(|source| AutostartError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, contents: &str) -> Result<(), AutostartError> {
        fs::write(&self.path, contents).map_err(|source| AutostartError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Point the desktop entry at an absolute icon path.
    ///
    /// Desktop files cannot use relative icon paths. Returns whether the file changed.
    pub fn ensure_icon_path(&self, icon: &Path) -> Result<bool, AutostartError> {
        let contents = self.read()?;
        let icon = icon.display().to_string();
        if get_entry(&contents, ICON_KEY) == Some(icon.as_str()) {
            return Ok(false);
        }

        self.write(&set_entry(&contents, ICON_KEY, &icon))?;
        info!("Desktop file icon set to {}", icon);
        Ok(true)
    }
}

impl Autostart for DesktopEntryAutostart {
    fn is_autostart_enabled(&self) -> Result<bool, AutostartError> {
        let contents = self.read()?;
        match get_entry(&contents, AUTOSTART_KEY).map(str::to_lowercase).as_deref() {
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            _ => Err(AutostartError::MissingKey { key: AUTOSTART_KEY }),
        }
    }

    fn set_autostart_enabled(&self, enabled: bool) -> Result<(), AutostartError> {
        let contents = self.read()?;
        let value = if enabled { "true" } else { "false" };
        self.write(&set_entry(&contents, AUTOSTART_KEY, value))?;
        info!("Autostart set to {}", value);
        Ok(())
    }
}

/// Value of `key` in the `[Desktop Entry]` group
fn get_entry<'a>(contents: &'a str, key: &str) -> Option<&'a str> {
    let mut in_group = false;
    for line in contents.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_group = line == DESKTOP_ENTRY_GROUP;
            continue;
        }
        if !in_group {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            if k.trim() == key {
                return Some(v.trim());
            }
        }
    }
    None
}

/// Replace or insert `key=value` in the `[Desktop Entry]` group
fn set_entry(contents: &str, key: &str, value: &str) -> String {
    let entry = format!("{}={}", key, value);
    let mut lines: Vec<String> = Vec::new();
    let mut in_group = false;
    let mut header_index = None;
    let mut replaced = false;

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_group = trimmed == DESKTOP_ENTRY_GROUP;
            if in_group {
                header_index = Some(lines.len());
            }
        } else if in_group && !replaced {
            if let Some((k, _)) = trimmed.split_once('=') {
                if k.trim() == key {
                    lines.push(entry.clone());
                    replaced = true;
                    continue;
                }
            }
        }
        lines.push(line.to_string());
    }

    if !replaced {
        match header_index {
            Some(i) => lines.insert(i + 1, entry),
            None => {
                lines.insert(0, DESKTOP_ENTRY_GROUP.to_string());
                lines.insert(1, entry);
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
