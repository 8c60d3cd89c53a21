//! Settings file.
//!
//! ```toml
//! [launcher]
//! launch_url = "http://127.0.0.1:20400"
//!
//! [client]
//! rs_plugin_loader = true
//! ```

use anyhow::{Context, Result};
use bolt_core::{ClientOptions, LauncherConfig};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub launcher: LauncherConfig,
    pub client: ClientOptions,
}

impl Settings {
    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
