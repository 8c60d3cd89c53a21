//! Launcher configuration.
//!
//! [`LauncherConfig`] holds the remote endpoints and transport limits,
//! [`ClientOptions`] the per-provider toggles the user controls. Both
//! deserialize from partial documents; missing keys take their defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default Direct6 distribution root (official Windows/Mac clients).
pub const DEFAULT_DIRECT6_URL: &str = "https://jagex.akamaized.net/direct6/";

/// Default Debian repository root for the official Linux client.
pub const DEFAULT_CONTENT_URL: &str = "https://content.runescape.com/downloads/ubuntu/";

/// Default GitHub releases listing for the RuneLite launcher.
pub const DEFAULT_RUNELITE_RELEASES_URL: &str =
    "https://api.github.com/repos/runelite/launcher/releases";

/// Default HDOS getdown manifest.
pub const DEFAULT_HDOS_GETDOWN_URL: &str = "https://cdn.hdos.dev/client/getdown.txt";

/// Default HDOS launcher jar location; `{version}` is substituted.
pub const DEFAULT_HDOS_JAR_URL: &str = "https://cdn.hdos.dev/launcher/v{version}/hdos-launcher.jar";

/// Default `jav_config` URI passed to the RS3 Linux client.
pub const DEFAULT_CONFIG_URI: &str = "https://www.runescape.com/k=5/l=$(Language:0)/jav_config.ws";

/// Remote endpoints and transport limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Direct6 root; metadata paths are appended directly.
    pub direct6_url: String,
    /// Metadata path prefix for RS3 official clients (`{prefix}-win`).
    pub rs3_meta_prefix: String,
    /// Debian repository root.
    pub content_url: String,
    /// RuneLite GitHub releases listing.
    pub runelite_releases_url: String,
    /// HDOS getdown manifest.
    pub hdos_getdown_url: String,
    /// HDOS jar URL template containing `{version}`.
    pub hdos_jar_url: String,
    /// Base URL of the local launch endpoint.
    pub launch_url: String,
    /// `config_uri` sent to the RS3 Linux client when none is configured.
    pub default_config_uri: String,
    /// Rewrite `http:` metafile and piece URLs to `https:`.
    pub enforce_https: bool,
    /// TCP connect timeout for every request.
    pub connect_timeout_secs: u64,
    /// Overall timeout for a single request, body included.
    pub request_timeout_secs: u64,
    /// Upper bound on concurrent Direct6 piece downloads.
    pub max_chunk_concurrency: usize,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            direct6_url: DEFAULT_DIRECT6_URL.to_string(),
            rs3_meta_prefix: "runescape".to_string(),
            content_url: DEFAULT_CONTENT_URL.to_string(),
            runelite_releases_url: DEFAULT_RUNELITE_RELEASES_URL.to_string(),
            hdos_getdown_url: DEFAULT_HDOS_GETDOWN_URL.to_string(),
            hdos_jar_url: DEFAULT_HDOS_JAR_URL.to_string(),
            launch_url: "http://127.0.0.1:20400".to_string(),
            default_config_uri: DEFAULT_CONFIG_URI.to_string(),
            enforce_https: true,
            connect_timeout_secs: 30,
            request_timeout_secs: 600,
            max_chunk_concurrency: 16,
        }
    }
}

impl LauncherConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Piece download concurrency, never below one.
    pub fn chunk_concurrency(&self) -> usize {
        self.max_chunk_concurrency.max(1)
    }

    /// Full URL of a local launch endpoint path.
    pub fn launch_endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.launch_url.trim_end_matches('/'))
    }
}

/// User-controlled provider toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Launch a local RuneLite jar instead of the latest release.
    pub runelite_use_custom_jar: bool,
    /// Path of the local RuneLite jar.
    pub runelite_custom_jar: Option<String>,
    /// Enable the plugin loader for the RS3 Linux client.
    pub rs_plugin_loader: bool,
    /// Custom `jav_config` URI for the RS3 Linux client.
    pub rs_config_uri: Option<String>,
    /// Ask the launch endpoint to enable Flatpak rich presence for RuneLite.
    pub flatpak_rich_presence: bool,
}

impl ClientOptions {
    /// The custom jar path, if custom jars are enabled and a path is set.
    pub fn custom_runelite_jar(&self) -> Option<&str> {
        self.runelite_custom_jar
            .as_deref()
            .filter(|p| self.runelite_use_custom_jar && !p.is_empty())
    }
}
