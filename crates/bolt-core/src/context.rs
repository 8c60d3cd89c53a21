//! Shared launch context.
//!
//! Groups the collaborators every stage of a launch needs, so resolvers and
//! the dispatcher don't each take five arguments.

use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::Reporter;
use crate::config::{ClientOptions, LauncherConfig};
use crate::error::LaunchError;
use crate::store::HashStore;

/// Groups common state used during a launch attempt.
#[derive(Clone)]
pub struct Context {
    pub client: Client,
    pub config: Arc<LauncherConfig>,
    pub options: ClientOptions,
    pub store: Arc<dyn HashStore>,
    pub reporter: Arc<dyn Reporter>,
    pub cancel: CancellationToken,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Build a context with an HTTP client configured from `config`.
    pub fn new(
        config: LauncherConfig,
        options: ClientOptions,
        store: Arc<dyn HashStore>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, LaunchError> {
        let client = crate::io::download::build_client(&config)?;
        Ok(Self::with_client(client, config, options, store, reporter))
    }

    pub fn with_client(
        client: Client,
        config: LauncherConfig,
        options: ClientOptions,
        store: Arc<dyn HashStore>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            client,
            config: Arc::new(config),
            options,
            store,
            reporter,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the cancellation token, e.g. with a child of an application-wide one.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fail with [`LaunchError::Cancelled`] if the attempt has been cancelled.
    pub fn check_cancelled(&self) -> Result<(), LaunchError> {
        if self.cancel.is_cancelled() {
            Err(LaunchError::Cancelled)
        } else {
            Ok(())
        }
    }
}
