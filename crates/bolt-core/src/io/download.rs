//! HTTP fetches with status checking, progress reporting and cancellation.
//!
//! Every remote document and single-file artifact goes through here; Direct6
//! pieces use [`crate::io::chunked`] instead.

use futures::StreamExt;
use reqwest::Client;
use sha2::{Digest, Sha256};

use crate::config::LauncherConfig;
use crate::context::Context;
use crate::error::LaunchError;
use bolt_schema::Sha256Digest;

/// Upper bound on the buffer reserved up front from `Content-Length`.
const MAX_PREALLOC: u64 = 64 << 20;

/// Build the shared HTTP client: user agent plus connect and request timeouts.
pub fn build_client(config: &LauncherConfig) -> Result<Client, LaunchError> {
    Client::builder()
        .user_agent(crate::USER_AGENT)
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| LaunchError::transport("<client>", e))
}

/// GET `url` and return the body as text.
///
/// Non-2xx responses become [`LaunchError::Status`] carrying the trimmed body.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, LaunchError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| LaunchError::transport(url, e))?;
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| LaunchError::transport(url, e))?;

    if !status.is_success() {
        return Err(LaunchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: text.trim().to_string(),
        });
    }
    Ok(text)
}

/// Stream a single-file artifact into memory, reporting progress as
/// `label` and aborting promptly if the context is cancelled.
pub async fn download(ctx: &Context, url: &str, label: &str) -> Result<Vec<u8>, LaunchError> {
    ctx.check_cancelled()?;

    let resp = ctx
        .client
        .get(url)
        .send()
        .await
        .map_err(|e| LaunchError::transport(url, e))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(LaunchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    let total = resp.content_length();
    // Content-Length is only a hint; a lying server must not size the buffer.
    let mut buf = Vec::with_capacity(total.map_or(0, |t| t.min(MAX_PREALLOC) as usize));
    let mut stream = resp.bytes_stream();
    let mut last_permille = None;

    ctx.reporter.progress(label, 0, total);

    loop {
        let next = tokio::select! {
            () = ctx.cancel.cancelled() => return Err(LaunchError::Cancelled),
            next = stream.next() => next,
        };
        let Some(chunk) = next else { break };
        let chunk = chunk.map_err(|e| LaunchError::transport(url, e))?;
        buf.extend_from_slice(&chunk);

        // One report per tenth of a percent is plenty for a status line.
        let permille = total.filter(|t| *t > 0).map(|t| buf.len() as u64 * 1000 / t);
        if permille.is_none() || permille != last_permille {
            ctx.reporter.progress(label, buf.len() as u64, total);
            last_permille = permille;
        }
    }

    Ok(buf)
}

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check `data` against an expected digest.
pub fn verify_sha256(what: &str, data: &[u8], expected: &Sha256Digest) -> Result<(), LaunchError> {
    let actual = sha256_hex(data);
    if actual != expected.as_str() {
        return Err(LaunchError::integrity(
            what,
            format!("Hash mismatch: expected {expected}, got {actual}"),
        ));
    }
    Ok(())
}
