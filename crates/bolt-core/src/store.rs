//! Installed-identifier store.
//!
//! Remembers, per provider, the identifier of the last artifact that launched
//! successfully. The orchestrator reads it before resolving and writes it only
//! after the launch endpoint answers 200.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use bolt_schema::{InstalledId, Provider};

use crate::error::LaunchError;

pub trait HashStore: Send + Sync {
    /// Identifier recorded for `provider`, if any.
    fn get(&self, provider: Provider) -> Option<InstalledId>;

    /// Record `id` as installed for `provider`.
    fn set(&self, provider: Provider, id: InstalledId) -> Result<(), LaunchError>;
}

/// In-memory store, keyed by provider.
#[derive(Debug, Default)]
pub struct MemoryHashStore {
    entries: Mutex<HashMap<Provider, InstalledId>>,
}

impl MemoryHashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, e.g. from a persisted snapshot.
    pub fn with_entries(entries: impl IntoIterator<Item = (Provider, InstalledId)>) -> Self {
        Self {
            entries: Mutex::new(entries.into_iter().collect()),
        }
    }

    /// Copy of every recorded entry.
    pub fn snapshot(&self) -> HashMap<Provider, InstalledId> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HashStore for MemoryHashStore {
    fn get(&self, provider: Provider) -> Option<InstalledId> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&provider)
            .cloned()
    }

    fn set(&self, provider: Provider, id: InstalledId) -> Result<(), LaunchError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider, id);
        Ok(())
    }
}
