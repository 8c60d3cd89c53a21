//! Shared types and wire formats for the Bolt client launcher.
//!
//! Everything here is plain data: provider tags, launch sessions, installed
//! identifiers and the JSON documents served by the distribution endpoints.
//! Network and process concerns live in `bolt-core`.

/// Direct6 envelope documents and target range computation.
pub mod direct6;
/// GitHub Releases API documents.
pub mod github;
/// Installed identifiers and validated digests.
pub mod hash;
/// Provider tags.
pub mod provider;
/// Launch session parameters.
pub mod session;

// Re-exports
pub use direct6::{Catalog, Direct6Token, Metafile, MetafileEntry, RangeError, TargetFileRange};
pub use github::{GithubAsset, GithubRelease};
pub use hash::{DigestError, InstalledId, Sha256Digest};
pub use provider::{Game, ParseProviderError, Platform, Provider};
pub use session::LaunchSession;

/// Literal placeholder in a Direct6 piece format that receives the first two
/// hex characters of a chunk digest.
pub const DIGEST_PREFIX_PLACEHOLDER: &str = "{SubString:0,2,{TargetDigest}}";

/// Literal placeholder in a Direct6 piece format that receives the full hex
/// chunk digest.
pub const DIGEST_PLACEHOLDER: &str = "{TargetDigest}";

/// Number of framing bytes preceding the gzip stream in every Direct6 chunk.
pub const CHUNK_FRAME_PREFIX_LEN: usize = 6;
