use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Opaque marker of the last successfully launched artifact for a provider.
///
/// A SHA-256 hex digest for the RS3/official clients, a release asset id for
/// RuneLite and a version string for HDOS. Identifiers are only ever compared
/// for exact equality; no version ordering is implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct InstalledId(String);

impl InstalledId {
    /// Wrap an identifier string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for InstalledId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for InstalledId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for InstalledId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for InstalledId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Error returned when a string is not a well-formed SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    /// The hex portion is not 64 characters long.
    #[error("Invalid SHA256 digest: expected 64 hex characters, got {len} in '{value}'")]
    Length {
        /// Length that was found.
        len: usize,
        /// The rejected input.
        value: String,
    },
    /// The input contains characters outside `[0-9a-fA-F]`.
    #[error("Invalid SHA256 digest: contains non-hex characters in '{0}'")]
    NonHex(String),
}

/// A validated SHA-256 digest (64 lowercase hex characters).
///
/// Package indexes sometimes carry placeholder or truncated checksums; only a
/// value that parses as a `Sha256Digest` is used to verify a download.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Create a new `Sha256Digest`, validating the input.
    ///
    /// Accepts strings with or without a `sha256:` prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex portion is not exactly 64 ASCII hex characters.
    pub fn new(s: impl Into<String>) -> Result<Self, DigestError> {
        let s = s.into();
        let hex = s.strip_prefix("sha256:").unwrap_or(&s);

        if hex.len() != 64 {
            return Err(DigestError::Length {
                len: hex.len(),
                value: s.clone(),
            });
        }

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DigestError::NonHex(s.clone()));
        }

        Ok(Self(hex.to_lowercase()))
    }

    /// Get the digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Sha256Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
