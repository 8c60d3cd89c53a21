//! Launch orchestration.
//!
//! One attempt runs `resolve -> [download -> decompress -> assemble] ->
//! dispatch`. A failure at any stage ends the attempt; nothing is retried and
//! the hash store is only written by a successful dispatch.

use std::sync::Arc;

use tracing::{debug, info};

use bolt_schema::{InstalledId, LaunchSession, Provider};

use crate::context::Context;
use crate::dispatch::{DispatchRequest, dispatch, launch_params};
use crate::error::LaunchError;
use crate::io::chunked::{HttpChunkSource, assemble, fetch_chunks};
use crate::io::download::{download, verify_sha256};
use crate::providers::{FetchPlan, Resolution, for_provider};

/// Outcome of a successful launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub provider: Provider,
    /// Identifier recorded in the hash store, if this attempt installed one.
    pub installed: Option<InstalledId>,
    /// Size of the payload sent to the launch endpoint.
    pub payload_bytes: Option<usize>,
    /// Status text returned by the launch endpoint, trimmed.
    pub status: String,
}

/// Drives launch attempts against one [`Context`].
#[derive(Debug, Clone)]
pub struct Launcher {
    ctx: Context,
}

impl Launcher {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Resolve `provider` against the stored identifier without downloading
    /// or launching anything.
    pub async fn check(&self, provider: Provider) -> Result<Resolution, LaunchError> {
        let installed = self.ctx.store.get(provider);
        for_provider(provider)
            .resolve(&self.ctx, installed.as_ref())
            .await
    }

    /// Bring `provider` up to date if needed and launch it with `session`.
    ///
    /// Errors are reported through the context's reporter and also returned.
    pub async fn launch(
        &self,
        provider: Provider,
        session: &LaunchSession,
        configure: bool,
    ) -> Result<LaunchReport, LaunchError> {
        self.run(provider, session, configure)
            .await
            .inspect_err(|e| {
                self.ctx
                    .reporter
                    .error(&format!("Failed to launch {}: {e}", provider.label()));
            })
    }

    async fn run(
        &self,
        provider: Provider,
        session: &LaunchSession,
        configure: bool,
    ) -> Result<LaunchReport, LaunchError> {
        let ctx = &self.ctx;
        let strategy = for_provider(provider);
        let installed = ctx.store.get(provider);

        let (id, body) = match strategy.resolve(ctx, installed.as_ref()).await? {
            Resolution::UpToDate(id) => {
                debug!(%provider, %id, "already up to date");
                (None, None)
            }
            Resolution::NoPayload { reason } => {
                ctx.reporter.warning(&reason);
                (None, None)
            }
            Resolution::LocalJar(path) => {
                info!(%provider, %path, "launching local jar");
                (None, None)
            }
            Resolution::Update { id, version, plan } => {
                let label = match &version {
                    Some(v) => format!("Downloading {} {v}", provider.label()),
                    None => format!("Downloading {}", provider.label()),
                };
                ctx.reporter.info(&label);
                let body = self.fetch_payload(&plan, &label).await?;
                (id, Some(body))
            }
        };

        ctx.check_cancelled()?;

        let params = launch_params(provider, id.as_ref(), session, strategy.launch_flags(ctx));
        let payload_bytes = body.as_ref().map(Vec::len);
        let dispatched = dispatch(
            ctx,
            DispatchRequest {
                provider,
                configure,
                id,
                params,
                body,
            },
        )
        .await?;

        Ok(LaunchReport {
            provider,
            installed: dispatched.recorded,
            payload_bytes,
            status: dispatched.status,
        })
    }

    async fn fetch_payload(&self, plan: &FetchPlan, label: &str) -> Result<Vec<u8>, LaunchError> {
        let ctx = &self.ctx;
        match plan {
            FetchPlan::Single {
                url,
                expected_sha256,
            } => {
                let data = download(ctx, url, label).await?;
                if let Some(expected) = expected_sha256 {
                    verify_sha256(url, &data, expected)?;
                }
                Ok(data)
            }
            FetchPlan::Chunked(manifest) => {
                let source = Arc::new(HttpChunkSource::new(ctx.client.clone()));
                let chunks = fetch_chunks(ctx, source, &manifest.chunk_urls, label).await?;
                assemble(&chunks, manifest.range)
            }
        }
    }
}
