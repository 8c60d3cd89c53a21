//! Concurrent piece retrieval with order-preserving reassembly.
//!
//! Pieces are fetched with bounded concurrency and may complete in any order.
//! Each task returns `(index, payload)`, so results land in their own slot and
//! no lock is needed to restore digest order.

use std::sync::Arc;

use async_compression::tokio::bufread::GzipDecoder;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use tokio::io::AsyncReadExt;

use bolt_schema::{CHUNK_FRAME_PREFIX_LEN, TargetFileRange};

use crate::context::Context;
use crate::error::LaunchError;

/// Where raw (still framed and compressed) pieces come from.
#[async_trait]
pub trait ChunkSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, LaunchError>;
}

/// Fetches pieces over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChunkSource {
    client: Client,
}

impl HttpChunkSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChunkSource for HttpChunkSource {
    async fn fetch(&self, url: &str) -> Result<Bytes, LaunchError> {
        let resp = self
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
        resp.bytes()
            .await
            .map_err(|e| LaunchError::transport(url, e))
    }
}

/// Strip the framing prefix from a piece and gunzip the rest.
pub async fn decompress_chunk(url: &str, framed: &[u8]) -> Result<Vec<u8>, LaunchError> {
    let Some(gzip) = framed.get(CHUNK_FRAME_PREFIX_LEN..) else {
        return Err(LaunchError::parse(
            url,
            format!(
                "piece is {} bytes, shorter than its {CHUNK_FRAME_PREFIX_LEN}-byte frame",
                framed.len()
            ),
        ));
    };

    let mut decoder = GzipDecoder::new(gzip);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .await
        .map_err(|e| LaunchError::parse(url, format!("gzip: {e}")))?;
    Ok(out)
}

/// Fetch and decompress every piece, returning payloads in `urls` order.
///
/// The first failure aborts the remaining fetches; no partial result is
/// returned.
pub async fn fetch_chunks(
    ctx: &Context,
    source: Arc<dyn ChunkSource>,
    urls: &[String],
    label: &str,
) -> Result<Vec<Vec<u8>>, LaunchError> {
    let total = urls.len() as u64;
    let mut slots: Vec<Option<Vec<u8>>> = vec![None; urls.len()];
    let mut done = 0u64;

    ctx.reporter.progress(label, 0, Some(total));

    let mut pieces = stream::iter(urls.iter().enumerate())
        .map(|(index, url)| {
            let source = Arc::clone(&source);
            async move {
                let framed = source.fetch(url).await?;
                let payload = decompress_chunk(url, &framed).await?;
                Ok::<_, LaunchError>((index, payload))
            }
        })
        .buffer_unordered(ctx.config.chunk_concurrency());

    loop {
        let next = tokio::select! {
            () = ctx.cancel.cancelled() => return Err(LaunchError::Cancelled),
            next = pieces.try_next() => next?,
        };
        let Some((index, payload)) = next else { break };
        slots[index] = Some(payload);
        done += 1;
        ctx.reporter.progress(label, done, Some(total));
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.ok_or_else(|| LaunchError::integrity(&urls[i], "piece missing after download"))
        })
        .collect()
}

/// Slice `range` out of the virtual concatenation of `chunks`.
///
/// Only the overlapping part of each chunk is copied.
pub fn assemble(chunks: &[Vec<u8>], range: TargetFileRange) -> Result<Vec<u8>, LaunchError> {
    let available: u64 = chunks.iter().map(|c| c.len() as u64).sum();
    let end = range
        .end()
        .filter(|end| *end <= available)
        .ok_or_else(|| {
            LaunchError::integrity(
                "assembled pieces",
                format!(
                    "executable range {}+{} exceeds {available} assembled bytes",
                    range.offset, range.size
                ),
            )
        })?;

    let mut out = Vec::with_capacity(range.size as usize);
    let mut chunk_start = 0u64;
    for chunk in chunks {
        let chunk_end = chunk_start + chunk.len() as u64;
        if chunk_end > range.offset && chunk_start < end {
            let from = range.offset.saturating_sub(chunk_start) as usize;
            let to = (end.min(chunk_end) - chunk_start) as usize;
            out.extend_from_slice(&chunk[from..to]);
        }
        if chunk_end >= end {
            break;
        }
        chunk_start = chunk_end;
    }

    Ok(out)
}
