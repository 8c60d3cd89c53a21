//! Per-provider update resolution.
//!
//! Each distribution publishes "what is the latest build and where is it" in
//! its own format. A [`ClientProvider`] turns that into a [`Resolution`]; the
//! launcher then downloads whatever the resolution asks for and dispatches.

use async_trait::async_trait;

use bolt_schema::{InstalledId, Provider, Sha256Digest};

use crate::config::ClientOptions;
use crate::context::Context;
use crate::direct6::Direct6Manifest;
use crate::error::LaunchError;

pub mod debian;
pub mod getdown;
pub mod github;
pub mod official;

pub use debian::DebianIndex;
pub use getdown::GetdownManifest;
pub use github::GithubReleases;
pub use official::Direct6Catalog;

/// What a provider found out about its latest build.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The installed build is the latest one; launch without a payload.
    UpToDate(InstalledId),
    /// Metadata could not be interpreted, but the provider treats that as
    /// best-effort: launch without a payload.
    NoPayload { reason: String },
    /// Launch a jar from the local filesystem; nothing to download.
    LocalJar(String),
    /// A build that differs from the installed one is available.
    Update {
        /// Identifier to record once the launch succeeds.
        id: Option<InstalledId>,
        /// Version shown to the user, if the metadata has one.
        version: Option<String>,
        /// How to obtain the payload.
        plan: FetchPlan,
    },
}

/// How to obtain a payload.
#[derive(Debug, Clone)]
pub enum FetchPlan {
    /// One file, optionally checked against a digest.
    Single {
        url: String,
        expected_sha256: Option<Sha256Digest>,
    },
    /// Direct6 pieces to fetch, decompress and carve.
    Chunked(Direct6Manifest),
}

#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// The provider this strategy serves.
    fn provider(&self) -> Provider;

    /// Determine whether a newer build than `installed` exists and where it is.
    async fn resolve(
        &self,
        ctx: &Context,
        installed: Option<&InstalledId>,
    ) -> Result<Resolution, LaunchError>;

    /// Provider-specific launch parameters beyond the identifier and session.
    fn launch_flags(&self, _ctx: &Context) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// The strategy for `provider`.
pub fn for_provider(provider: Provider) -> Box<dyn ClientProvider> {
    match provider {
        Provider::Rs3Deb => Box::new(DebianIndex),
        Provider::RuneLite => Box::new(GithubReleases),
        Provider::Hdos => Box::new(GetdownManifest),
        Provider::Official { game, platform } => Box::new(Direct6Catalog::new(game, platform)),
    }
}

/// `Some(value)` if `options` asks for RuneLite's custom jar.
pub(crate) fn custom_jar(options: &ClientOptions) -> Option<String> {
    options.custom_runelite_jar().map(str::to_string)
}

/// `UpToDate` if `latest` equals the installed identifier.
pub(crate) fn unchanged(latest: &str, installed: Option<&InstalledId>) -> Option<Resolution> {
    installed
        .filter(|i| i.as_str() == latest)
        .map(|i| Resolution::UpToDate(i.clone()))
}
