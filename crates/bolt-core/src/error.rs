//! Domain-specific errors for acquisition and launch.

use bolt_schema::{DigestError, RangeError};
use thiserror::Error;

/// Coarse classification of a [`LaunchError`], for callers that only need to
/// decide how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or non-2xx response from a remote endpoint.
    Transport,
    /// Malformed metadata.
    Parse,
    /// Metadata or payload failed a consistency check.
    Integrity,
    /// The local launch endpoint rejected the launch.
    Dispatch,
    /// The attempt was cancelled before dispatch.
    Cancelled,
    /// Local I/O failure.
    Io,
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error from {url}: {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Error parsing {what}: {reason}")]
    Parse { what: String, reason: String },

    #[error("Integrity check failed for {what}: {reason}")]
    Integrity { what: String, reason: String },

    #[error("Launch rejected ({status}): {message}")]
    Dispatch { status: u16, message: String },

    #[error("Download cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LaunchError {
    pub fn parse(what: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    pub fn integrity(what: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Integrity {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::Status { .. } => ErrorKind::Transport,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::Dispatch { .. } => ErrorKind::Dispatch,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<RangeError> for LaunchError {
    fn from(err: RangeError) -> Self {
        Self::integrity("metafile", err)
    }
}

impl From<DigestError> for LaunchError {
    fn from(err: DigestError) -> Self {
        Self::parse("digest", err)
    }
}
