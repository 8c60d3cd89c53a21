//! Official RS3 Linux client, published as a Debian package.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use bolt_schema::{InstalledId, Provider, Sha256Digest};

use super::{ClientProvider, FetchPlan, Resolution, unchanged};
use crate::context::Context;
use crate::error::LaunchError;
use crate::io::download::fetch_text;

/// Location of the package index under the repository root.
pub const PACKAGES_PATH: &str = "dists/trusty/non-free/binary-amd64/Packages";

/// Parse a Debian `Packages` stanza into a field map.
///
/// Each line is split on `": "`; the text before the first separator is the
/// key and the text up to the next separator is the value. Repeated keys keep
/// the last value. Lines without a separator map to an empty value.
pub fn parse_package_index(text: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut parts = line.split(": ");
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();
        fields.insert(key.to_string(), value.to_string());
    }
    fields
}

fn non_empty<'a>(fields: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    fields.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// Resolves the RS3 `.deb` from the Debian repository index.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebianIndex;

#[async_trait]
impl ClientProvider for DebianIndex {
    fn provider(&self) -> Provider {
        Provider::Rs3Deb
    }

    async fn resolve(
        &self,
        ctx: &Context,
        installed: Option<&InstalledId>,
    ) -> Result<Resolution, LaunchError> {
        let url = format!("{}{PACKAGES_PATH}", ctx.config.content_url);
        let text = fetch_text(&ctx.client, &url).await?;
        let fields = parse_package_index(&text);

        let (Some(filename), Some(_size)) = (non_empty(&fields, "Filename"), non_empty(&fields, "Size"))
        else {
            return Ok(Resolution::NoPayload {
                reason: format!("Could not parse package data from URL: {url}"),
            });
        };

        let sha256 = non_empty(&fields, "SHA256");
        if let Some(current) = sha256.and_then(|sha| unchanged(sha, installed)) {
            return Ok(current);
        }

        let expected_sha256 = sha256.and_then(|sha| Sha256Digest::new(sha).ok());
        if sha256.is_some() && expected_sha256.is_none() {
            debug!(?sha256, "package index digest is not a SHA-256, skipping verification");
        }

        Ok(Resolution::Update {
            id: sha256.map(InstalledId::from),
            version: non_empty(&fields, "Version").map(str::to_string),
            plan: FetchPlan::Single {
                url: format!("{}{filename}", ctx.config.content_url),
                expected_sha256,
            },
        })
    }

    fn launch_flags(&self, ctx: &Context) -> Vec<(&'static str, String)> {
        let mut flags = Vec::new();
        if ctx.options.rs_plugin_loader {
            flags.push(("plugin_loader", "1".to_string()));
        }
        let config_uri = ctx
            .options
            .rs_config_uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .unwrap_or(&ctx.config.default_config_uri);
        flags.push(("config_uri", config_uri.to_string()));
        flags
    }
}
