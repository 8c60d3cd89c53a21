use std::path::Path;

use anyhow::Result;
use bolt_schema::LaunchSession;
use tokio_util::sync::CancellationToken;

use super::{launcher, parse_provider};

/// Update `provider` if needed and hand it to the launch endpoint.
pub async fn launch(
    config: Option<&Path>,
    provider: &str,
    session: &LaunchSession,
    configure: bool,
    cancel: CancellationToken,
) -> Result<()> {
    let provider = parse_provider(provider)?;
    let launcher = launcher(config, cancel)?;

    let report = launcher.launch(provider, session, configure).await?;

    match (&report.installed, report.payload_bytes) {
        (Some(id), Some(bytes)) => println!("{provider}: installed {id} ({bytes} bytes)"),
        (None, Some(bytes)) => println!("{provider}: sent {bytes} bytes"),
        _ => println!("{provider}: launched without update"),
    }
    if !report.status.is_empty() {
        println!("{}", report.status);
    }
    Ok(())
}
