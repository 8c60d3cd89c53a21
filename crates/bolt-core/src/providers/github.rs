//! RuneLite launcher jar, published as a GitHub release asset.

use async_trait::async_trait;

use bolt_schema::github::find_asset;
use bolt_schema::{GithubRelease, InstalledId, Provider};

use super::{ClientProvider, FetchPlan, Resolution, custom_jar, unchanged};
use crate::context::Context;
use crate::error::LaunchError;
use crate::io::download::fetch_text;

/// Asset name searched for, case-insensitively, across all releases.
pub const RUNELITE_ASSET: &str = "runelite.jar";

/// Resolves the RuneLite launcher jar from the GitHub releases listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubReleases;

#[async_trait]
impl ClientProvider for GithubReleases {
    fn provider(&self) -> Provider {
        Provider::RuneLite
    }

    async fn resolve(
        &self,
        ctx: &Context,
        installed: Option<&InstalledId>,
    ) -> Result<Resolution, LaunchError> {
        if let Some(path) = custom_jar(&ctx.options) {
            return Ok(Resolution::LocalJar(path));
        }

        let url = &ctx.config.runelite_releases_url;
        let text = fetch_text(&ctx.client, url).await?;
        let releases: Vec<GithubRelease> =
            serde_json::from_str(&text).map_err(|e| LaunchError::parse(url, e))?;

        let asset = find_asset(&releases, RUNELITE_ASSET).ok_or_else(|| {
            LaunchError::parse(
                url,
                format!("no release has a '{RUNELITE_ASSET}' asset"),
            )
        })?;

        let id = asset.id.to_string();
        if let Some(current) = unchanged(&id, installed) {
            return Ok(current);
        }

        let version = releases
            .iter()
            .find(|r| r.assets.iter().any(|a| a.id == asset.id))
            .map(|r| r.tag_name.clone())
            .filter(|tag| !tag.is_empty());

        Ok(Resolution::Update {
            id: Some(InstalledId::new(id)),
            version,
            plan: FetchPlan::Single {
                url: asset.browser_download_url.clone(),
                expected_sha256: None,
            },
        })
    }

    fn launch_flags(&self, ctx: &Context) -> Vec<(&'static str, String)> {
        let mut flags = Vec::new();
        if let Some(path) = custom_jar(&ctx.options) {
            flags.push(("jar_path", path));
        }
        if ctx.options.flatpak_rich_presence {
            flags.push(("flatpak_rich_presence", "1".to_string()));
        }
        flags
    }
}
