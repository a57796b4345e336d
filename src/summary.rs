//! Cache-aside summarization pipeline.
//!
//! Each request terminates through exactly one of three paths: cached
//! summary replayed as a single fragment, no extractable content (client
//! error), or a fresh streamed generation whose accumulated text is
//! persisted once the upstream stream is drained.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cache::PaperCache;
use crate::error::{AppError, Result};
use crate::llm::{relay, Summarizer};
use crate::models::{Source, SummarizeRequest};
use crate::scrape::content;

/// Seam for full-text retrieval; only arXiv papers have an HTML rendition
/// to extract from.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Full text for a paper. Empty means "no content available" — the
    /// caller surfaces that as a client error, not a fetch failure.
    async fn full_text(&self, paper_id: &str, source: Source) -> String;
}

pub struct ArxivContent;

#[async_trait]
impl ContentProvider for ArxivContent {
    async fn full_text(&self, paper_id: &str, source: Source) -> String {
        match source {
            Source::Arxiv => match content::fetch_paper_content(paper_id).await {
                Ok(text) => text,
                Err(err) => {
                    warn!(paper_id, %err, "full-text fetch failed, treating as no content");
                    String::new()
                }
            },
            Source::Huggingface => String::new(),
        }
    }
}

/// Runs the pipeline and returns the fragment stream for the caller. The
/// cache write happens in the relay task after the upstream is exhausted,
/// whether or not the caller is still reading.
pub async fn run(
    cache: Arc<PaperCache>,
    provider: Arc<dyn ContentProvider>,
    summarizer: Arc<dyn Summarizer>,
    req: SummarizeRequest,
) -> Result<mpsc::Receiver<String>> {
    let (tx, rx) = mpsc::channel::<String>(32);

    if let Some(cached) = cache.summary(&req.paper_id).await {
        info!(paper_id = %req.paper_id, "summary cache hit");
        tokio::spawn(async move {
            let _ = tx.send(cached).await;
        });
        return Ok(rx);
    }

    let text = provider.full_text(&req.paper_id, req.source).await;
    if text.is_empty() {
        return Err(AppError::NoContent);
    }

    let upstream = summarizer.stream_summary(&text, req.language).await?;

    let paper_id = req.paper_id;
    tokio::spawn(async move {
        match relay(upstream, &tx).await {
            Some(full) if !full.is_empty() => {
                cache.set_summary(&paper_id, &full).await;
                info!(%paper_id, chars = full.len(), "summary generated and cached");
            }
            Some(_) => {
                warn!(%paper_id, "summarizer produced no content, skipping cache write");
            }
            None => {
                warn!(%paper_id, "caller disconnected mid-stream, skipping cache write");
            }
        }
    });

    Ok(rx)
}
