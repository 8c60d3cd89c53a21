//! Direct6 distribution documents.
//!
//! The official clients are published as three chained documents, each the
//! middle segment of a dot-separated envelope:
//!
//! ```text
//! {meta}/{meta}.json            -> Direct6Token   (which build is live)
//! {meta}/catalog/{id}/catalog.json -> Catalog      (where the pieces live)
//! Catalog.metafile              -> Metafile       (piece digests + file layout)
//! ```
//!
//! Decoding the envelopes is a transport concern handled by `bolt-core`; this
//! module only describes the JSON payloads and the file-layout arithmetic.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::provider::Platform;

/// Top-level environment listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Direct6Token {
    /// Named environments; only `production` is used.
    pub environments: Environments,
}

/// Environments listed in a [`Direct6Token`].
#[derive(Debug, Clone, Deserialize)]
pub struct Environments {
    /// The live production build.
    pub production: Environment,
}

/// One environment's current build.
#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    /// Build id; the canonical installed identifier for official clients.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Human readable build version, if present.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub version: Option<String>,
}

impl Direct6Token {
    /// Shortcut to the production environment.
    pub fn production(&self) -> &Environment {
        &self.environments.production
    }
}

/// Catalog of a single build.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// URL of the build's metafile envelope.
    pub metafile: String,
    /// Remote storage configuration.
    pub config: CatalogConfig,
}

/// `config` section of a [`Catalog`].
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Where the content-addressed pieces are served from.
    pub remote: RemoteConfig,
}

/// Piece storage location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    /// Base URL every piece path is appended to.
    pub base_url: String,
    /// Piece path template containing the digest placeholders.
    pub piece_format: String,
}

/// Piece list and logical file layout of a build.
#[derive(Debug, Clone, Deserialize)]
pub struct Metafile {
    /// Build id; matches [`Environment::id`].
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Content-addressed pieces.
    pub pieces: Pieces,
    /// Files laid out back to back over the decompressed piece stream.
    pub files: Vec<MetafileEntry>,
}

/// `pieces` section of a [`Metafile`].
#[derive(Debug, Clone, Deserialize)]
pub struct Pieces {
    /// Base64 piece digests; their order is the concatenation order.
    pub digests: Vec<String>,
}

/// One logical file in a [`Metafile`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetafileEntry {
    /// Path of the file inside the build.
    pub name: String,
    /// Size of the file in bytes.
    pub size: u64,
}

/// Byte range of the target executable inside the concatenated piece stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetFileRange {
    /// Offset of the first byte.
    pub offset: u64,
    /// Length of the file.
    pub size: u64,
}

impl TargetFileRange {
    /// Exclusive end of the range, or `None` if it overflows.
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.size)
    }
}

/// A metafile's file list does not identify exactly one executable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// No file matched the platform's executable predicate.
    #[error("file list has no possibilities for main exe")]
    NoTarget,
    /// More than one file matched.
    #[error("file list has multiple possibilities for main exe ('{first}', '{second}')")]
    MultipleTargets {
        /// First matching file.
        first: String,
        /// Second matching file.
        second: String,
    },
    /// File sizes add up to more than a `u64` can address.
    #[error("file list sizes overflow at '{name}'")]
    Overflow {
        /// File whose size pushed the running offset past `u64::MAX`.
        name: String,
    },
}

impl Metafile {
    /// Total length of the virtual buffer described by the file list, or
    /// `None` if the sizes overflow.
    pub fn total_size(&self) -> Option<u64> {
        self.files
            .iter()
            .try_fold(0u64, |total, f| total.checked_add(f.size))
    }

    /// Locate the platform's main executable in the file list.
    ///
    /// The offset is the sum of the sizes of every file listed before it.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError`] unless exactly one file matches and its range
    /// fits in a `u64`.
    pub fn target_range(&self, platform: Platform) -> Result<TargetFileRange, RangeError> {
        let mut offset = 0u64;
        let mut found: Option<(&MetafileEntry, u64)> = None;

        for file in &self.files {
            if platform.is_target_executable(&file.name) {
                if let Some((first, _)) = found {
                    return Err(RangeError::MultipleTargets {
                        first: first.name.clone(),
                        second: file.name.clone(),
                    });
                }
                if offset.checked_add(file.size).is_none() {
                    return Err(RangeError::Overflow {
                        name: file.name.clone(),
                    });
                }
                found = Some((file, offset));
            } else if found.is_none() {
                offset = offset
                    .checked_add(file.size)
                    .ok_or_else(|| RangeError::Overflow {
                        name: file.name.clone(),
                    })?;
            }
        }

        found
            .map(|(file, offset)| TargetFileRange {
                offset,
                size: file.size,
            })
            .ok_or(RangeError::NoTarget)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Int(u64),
    Float(f64),
}

impl From<Loose> for String {
    fn from(value: Loose) -> Self {
        match value {
            Loose::Text(s) => s,
            Loose::Int(n) => n.to_string(),
            Loose::Float(f) => f.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Loose::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Loose>::deserialize(deserializer).map(|v| v.map(String::from))
}
