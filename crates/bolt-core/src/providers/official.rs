//! Official Windows/Mac clients, distributed through Direct6.

use async_trait::async_trait;

use bolt_schema::{Game, InstalledId, Platform, Provider};

use super::{ClientProvider, FetchPlan, Resolution, unchanged};
use crate::context::Context;
use crate::direct6::{self, meta_path};
use crate::error::LaunchError;

/// Resolves an official client build by walking the Direct6 envelope chain.
#[derive(Debug, Clone, Copy)]
pub struct Direct6Catalog {
    game: Game,
    platform: Platform,
}

impl Direct6Catalog {
    pub fn new(game: Game, platform: Platform) -> Self {
        Self { game, platform }
    }
}

#[async_trait]
impl ClientProvider for Direct6Catalog {
    fn provider(&self) -> Provider {
        Provider::Official {
            game: self.game,
            platform: self.platform,
        }
    }

    async fn resolve(
        &self,
        ctx: &Context,
        installed: Option<&InstalledId>,
    ) -> Result<Resolution, LaunchError> {
        let config = &ctx.config;
        let meta = meta_path(self.game, self.platform, &config.rs3_meta_prefix);

        let token = direct6::fetch_token(&ctx.client, &config.direct6_url, &meta).await?;
        let production = token.production();
        if let Some(current) = unchanged(&production.id, installed) {
            return Ok(current);
        }

        ctx.check_cancelled()?;
        let manifest = direct6::fetch_manifest(
            &ctx.client,
            &config.direct6_url,
            &meta,
            &token,
            self.platform,
            config.enforce_https,
        )
        .await?;

        Ok(Resolution::Update {
            id: Some(InstalledId::new(manifest.id.clone())),
            version: manifest.version.clone(),
            plan: FetchPlan::Chunked(manifest),
        })
    }
}
