use std::path::Path;

use anyhow::Result;
use bolt_core::{FetchPlan, Resolution};
use tokio_util::sync::CancellationToken;

use super::{launcher, parse_provider};

/// Resolve `provider` and print whether an update is available.
pub async fn check(config: Option<&Path>, provider: &str) -> Result<()> {
    let provider = parse_provider(provider)?;
    let launcher = launcher(config, CancellationToken::new())?;

    match launcher.check(provider).await? {
        Resolution::UpToDate(id) => println!("{provider}: up to date ({id})"),
        Resolution::NoPayload { reason } => println!("{provider}: {reason}"),
        Resolution::LocalJar(path) => println!("{provider}: using local jar {path}"),
        Resolution::Update { id, version, plan } => {
            let name = version
                .or_else(|| id.map(|id| id.to_string()))
                .unwrap_or_else(|| "unknown version".to_string());
            let source = match plan {
                FetchPlan::Single { url, .. } => url,
                FetchPlan::Chunked(manifest) => {
                    format!("{} pieces", manifest.chunk_urls.len())
                }
            };
            println!("{provider}: update available: {name} from {source}");
        }
    }
    Ok(())
}
