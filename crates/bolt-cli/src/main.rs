//! bolt - game client launcher CLI

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use bolt_cli::cmd;
use bolt_cli::{Cli, Commands};
use bolt_schema::LaunchSession;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Launch {
            provider,
            session_id,
            character_id,
            display_name,
            configure,
        } => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling download");
                    on_interrupt.cancel();
                }
            });

            let session = LaunchSession::new(session_id, character_id, display_name);
            cmd::launch::launch(config, &provider, &session, configure, cancel).await
        }
        Commands::Check { provider } => cmd::check::check(config, &provider).await,
        Commands::Installed => cmd::installed::installed(),
        Commands::Providers => {
            cmd::providers::providers();
            Ok(())
        }
    }
}
