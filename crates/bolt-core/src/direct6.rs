//! Direct6 envelope decoding and piece manifest construction.
//!
//! An official client build is described by three envelopes fetched in turn
//! (token, catalog, metafile). Each envelope is a three-segment dot-separated
//! string whose middle segment is standard base64 of a JSON document; the
//! outer segments are not verified. The result of walking the chain is a
//! [`Direct6Manifest`]: the ordered piece URLs and the byte range of the main
//! executable inside the decompressed, concatenated pieces.

use std::borrow::Cow;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use bolt_schema::direct6::RemoteConfig;
use bolt_schema::{
    Catalog, DIGEST_PLACEHOLDER, DIGEST_PREFIX_PLACEHOLDER, Direct6Token, Game, Metafile,
    Platform, TargetFileRange,
};

use crate::error::LaunchError;
use crate::io::download::fetch_text;

/// Standard alphabet; padding optional since envelope segments usually omit it.
const ENVELOPE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Everything needed to download and carve out one build's executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Direct6Manifest {
    /// Build id, recorded as the installed identifier on success.
    pub id: String,
    /// Build version for display.
    pub version: Option<String>,
    /// Piece URLs in concatenation order.
    pub chunk_urls: Vec<String>,
    /// Location of the executable in the concatenated pieces.
    pub range: TargetFileRange,
}

/// Metadata path for an official client, e.g. `osrs-win` or `runescape-mac`.
pub fn meta_path(game: Game, platform: Platform, rs3_prefix: &str) -> String {
    let prefix = match game {
        Game::Osrs => "osrs",
        Game::Rs3 => rs3_prefix,
    };
    format!("{prefix}-{}", platform.meta_suffix())
}

pub fn token_url(base: &str, meta_path: &str) -> String {
    format!("{base}{meta_path}/{meta_path}.json")
}

pub fn catalog_url(base: &str, meta_path: &str, id: &str) -> String {
    format!("{base}{meta_path}/catalog/{id}/catalog.json")
}

/// Decode the JSON document carried in the middle segment of an envelope.
pub fn decode_envelope<T: DeserializeOwned>(what: &str, text: &str) -> Result<T, LaunchError> {
    let segments: Vec<&str> = text.trim().split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(LaunchError::parse(
            what,
            format!(
                "expected 3 dot-separated segments, found {}",
                segments.len()
            ),
        ));
    };

    let json = ENVELOPE_BASE64
        .decode(payload)
        .map_err(|e| LaunchError::parse(what, e))?;
    serde_json::from_slice(&json).map_err(|e| LaunchError::parse(what, e))
}

/// Convert a base64 piece digest to lowercase hex.
pub fn digest_to_hex(digest: &str) -> Result<String, LaunchError> {
    let bytes = ENVELOPE_BASE64
        .decode(digest)
        .map_err(|e| LaunchError::parse(format!("piece digest '{digest}'"), e))?;
    Ok(hex::encode(bytes))
}

/// Rewrite a leading `http:` (any case) to `https:`.
pub fn upgrade_insecure(url: &str) -> Cow<'_, str> {
    match url.get(..5) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http:") => {
            Cow::Owned(format!("https:{}", &url[5..]))
        }
        _ => Cow::Borrowed(url),
    }
}

fn maybe_upgrade(url: &str, enforce_https: bool) -> Cow<'_, str> {
    if enforce_https {
        upgrade_insecure(url)
    } else {
        Cow::Borrowed(url)
    }
}

/// Build a piece URL from the catalog's remote template and a hex digest.
///
/// The prefix placeholder is substituted first because it contains the full
/// digest placeholder; only the first occurrence of each is replaced.
pub fn chunk_url(remote: &RemoteConfig, hex_digest: &str, enforce_https: bool) -> String {
    let base = maybe_upgrade(&remote.base_url, enforce_https);
    let prefix = hex_digest.get(..2).unwrap_or(hex_digest);
    let path = remote
        .piece_format
        .replacen(DIGEST_PREFIX_PLACEHOLDER, prefix, 1)
        .replacen(DIGEST_PLACEHOLDER, hex_digest, 1);
    format!("{base}{path}")
}

/// Combine a decoded catalog and metafile into a download plan.
pub fn build_manifest(
    token_id: &str,
    version: Option<String>,
    catalog: &Catalog,
    metafile: &Metafile,
    platform: Platform,
    enforce_https: bool,
) -> Result<Direct6Manifest, LaunchError> {
    if metafile.id != token_id {
        return Err(LaunchError::integrity(
            "metafile",
            format!(
                "build id '{}' does not match production id '{token_id}'",
                metafile.id
            ),
        ));
    }

    let chunk_urls = metafile
        .pieces
        .digests
        .iter()
        .map(|d| {
            digest_to_hex(d).map(|hex| chunk_url(&catalog.config.remote, &hex, enforce_https))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let range = metafile.target_range(platform)?;
    debug!(
        pieces = chunk_urls.len(),
        offset = range.offset,
        size = range.size,
        "decoded metafile"
    );

    Ok(Direct6Manifest {
        id: metafile.id.clone(),
        version,
        chunk_urls,
        range,
    })
}

/// Fetch and decode the production token for `meta_path`.
pub async fn fetch_token(
    client: &Client,
    base: &str,
    meta_path: &str,
) -> Result<Direct6Token, LaunchError> {
    let url = token_url(base, meta_path);
    let text = fetch_text(client, &url).await?;
    decode_envelope(&url, &text)
}

/// Walk the catalog and metafile of build `token_id` and produce its manifest.
pub async fn fetch_manifest(
    client: &Client,
    base: &str,
    meta_path: &str,
    token: &Direct6Token,
    platform: Platform,
    enforce_https: bool,
) -> Result<Direct6Manifest, LaunchError> {
    let production = token.production();

    let catalog_url = catalog_url(base, meta_path, &production.id);
    let catalog_text = fetch_text(client, &catalog_url).await?;
    let catalog: Catalog = decode_envelope(&catalog_url, &catalog_text)?;

    let metafile_url = maybe_upgrade(&catalog.metafile, enforce_https).into_owned();
    let metafile_text = fetch_text(client, &metafile_url).await?;
    let metafile: Metafile = decode_envelope(&metafile_url, &metafile_text)?;

    build_manifest(
        &production.id,
        production.version.clone(),
        &catalog,
        &metafile,
        platform,
        enforce_https,
    )
    .map_err(|e| match e {
        LaunchError::Integrity { reason, .. } => LaunchError::Integrity {
            what: metafile_url.clone(),
            reason,
        },
        other => other,
    })
}
