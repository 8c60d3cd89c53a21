//! HDOS launcher jar, versioned through a getdown manifest.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use bolt_schema::{InstalledId, Provider};

use super::{ClientProvider, FetchPlan, Resolution, unchanged};
use crate::context::Context;
use crate::error::LaunchError;
use crate::io::download::fetch_text;

static LAUNCHER_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^launcher\.version *= *(.*?)\r?$").expect("launcher.version pattern")
});

/// Value of the first `launcher.version` line, leading spaces after `=`
/// stripped.
pub fn launcher_version(manifest: &str) -> Option<&str> {
    LAUNCHER_VERSION
        .captures(manifest)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Resolves the HDOS launcher from its getdown manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetdownManifest;

#[async_trait]
impl ClientProvider for GetdownManifest {
    fn provider(&self) -> Provider {
        Provider::Hdos
    }

    async fn resolve(
        &self,
        ctx: &Context,
        installed: Option<&InstalledId>,
    ) -> Result<Resolution, LaunchError> {
        let url = &ctx.config.hdos_getdown_url;
        let text = fetch_text(&ctx.client, url).await?;

        let Some(version) = launcher_version(&text).filter(|v| !v.is_empty()) else {
            return Ok(Resolution::NoPayload {
                reason: format!("Couldn't parse latest launcher version from {url}"),
            });
        };

        if let Some(current) = unchanged(version, installed) {
            return Ok(current);
        }

        Ok(Resolution::Update {
            id: Some(InstalledId::from(version)),
            version: Some(version.to_string()),
            plan: FetchPlan::Single {
                url: ctx.config.hdos_jar_url.replace("{version}", version),
                expected_sha256: None,
            },
        })
    }
}
