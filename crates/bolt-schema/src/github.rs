//! GitHub Releases REST API documents.

use serde::Deserialize;

/// One entry of `GET /repos/{owner}/{repo}/releases`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRelease {
    /// Release tag, e.g. `2.7.1`.
    #[serde(default)]
    pub tag_name: String,
    /// Files attached to the release.
    #[serde(default)]
    pub assets: Vec<GithubAsset>,
}

/// A file attached to a GitHub release.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubAsset {
    /// Numeric asset id, unique across GitHub.
    pub id: u64,
    /// File name of the asset.
    pub name: String,
    /// Direct download URL.
    pub browser_download_url: String,
    /// API URL of the asset.
    #[serde(default)]
    pub url: String,
}

/// Find the first asset across all releases whose name matches `name`,
/// ignoring case. Releases are searched in the order the API returned them.
pub fn find_asset<'a>(releases: &'a [GithubRelease], name: &str) -> Option<&'a GithubAsset> {
    let wanted = name.to_lowercase();
    releases
        .iter()
        .flat_map(|r| r.assets.iter())
        .find(|a| a.name.to_lowercase() == wanted)
}
