use anyhow::{Result, anyhow};
use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Returns the primary configuration directory, or None if the user's home cannot be resolved.
pub fn try_bolt_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("BOLT_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".bolt"))
}

/// Returns the Bolt home directory (`~/.bolt`).
pub fn bolt_home() -> Result<PathBuf> {
    try_bolt_home().ok_or_else(|| anyhow!("Could not determine home directory. Set BOLT_HOME to override."))
}

/// Settings file: ~/.bolt/config.toml, unless overridden.
pub fn config_path(overridden: Option<&Path>) -> Result<PathBuf> {
    match overridden {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(bolt_home()?.join("config.toml")),
    }
}

/// Installed identifiers: ~/.bolt/installed.toml
pub fn installed_path() -> Result<PathBuf> {
    Ok(bolt_home()?.join("installed.toml"))
}
