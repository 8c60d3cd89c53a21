//! File-backed hash store.
//!
//! `installed.toml` maps provider keys to identifiers:
//!
//! ```toml
//! rs3-deb = "abc123"
//! runelite = "991"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bolt_core::{HashStore, LaunchError, MemoryHashStore};
use bolt_schema::{InstalledId, Provider};

#[derive(Debug)]
pub struct FileHashStore {
    path: PathBuf,
    inner: MemoryHashStore,
}

impl FileHashStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse(&text).with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            inner: MemoryHashStore::with_entries(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recorded entries, ordered by provider key.
    pub fn entries(&self) -> BTreeMap<String, InstalledId> {
        self.inner
            .snapshot()
            .into_iter()
            .map(|(provider, id)| (provider.key().to_string(), id))
            .collect()
    }

    fn save(&self) -> Result<(), LaunchError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error("create", parent, &e))?;
        }
        let text = toml::to_string(&self.entries())
            .map_err(|e| LaunchError::Io(std::io::Error::other(e)))?;
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, text).map_err(|e| io_error("write", &tmp, &e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_error("replace", &self.path, &e))?;
        Ok(())
    }
}

fn io_error(action: &str, path: &Path, err: &std::io::Error) -> LaunchError {
    LaunchError::Io(std::io::Error::new(
        err.kind(),
        format!("Failed to {action} {}: {err}", path.display()),
    ))
}

fn parse(text: &str) -> Result<Vec<(Provider, InstalledId)>> {
    let raw: BTreeMap<String, InstalledId> = toml::from_str(text)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, id)| match key.parse::<Provider>() {
            Ok(provider) => Some((provider, id)),
            Err(e) => {
                tracing::warn!("Ignoring installed entry: {e}");
                None
            }
        })
        .collect())
}

impl HashStore for FileHashStore {
    fn get(&self, provider: Provider) -> Option<InstalledId> {
        self.inner.get(provider)
    }

    fn set(&self, provider: Provider, id: InstalledId) -> Result<(), LaunchError> {
        self.inner.set(provider, id)?;
        self.save()
    }
}
