//! Subcommand implementations.

pub mod check;
pub mod installed;
pub mod launch;
pub mod providers;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use bolt_core::{Context, Launcher, LogReporter};
use bolt_schema::Provider;
use tokio_util::sync::CancellationToken;

use crate::paths::{config_path, installed_path};
use crate::settings::Settings;
use crate::store::FileHashStore;

/// Parse a provider tag given on the command line.
pub(crate) fn parse_provider(tag: &str) -> Result<Provider> {
    Ok(tag.parse::<Provider>()?)
}

/// Build a launcher from the settings file and the on-disk hash store.
pub(crate) fn launcher(config: Option<&Path>, cancel: CancellationToken) -> Result<Launcher> {
    let settings = Settings::load(&config_path(config)?)?;
    let store = FileHashStore::open(installed_path()?)?;
    let ctx = Context::new(
        settings.launcher,
        settings.client,
        Arc::new(store),
        Arc::new(LogReporter),
    )
    .context("Failed to initialise HTTP client")?
    .with_cancel(cancel);
    Ok(Launcher::new(ctx))
}
