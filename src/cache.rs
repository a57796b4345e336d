//! Typed cache layer over the key-value store.
//!
//! Three namespaces, each with its own TTL: whole paper lists per source,
//! one summary per paper id, and fixed-window rate-limit counters. Paper
//! lists use whole-list replace semantics: a refresh overwrites the slot,
//! stale papers vanish immediately rather than being merged out.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Paper, Source};
use crate::store::KeyValueStore;

const ARXIV_PAPERS_KEY: &str = "arxiv:cs:ai";
const HF_PAPERS_KEY: &str = "huggingface:trending";

/// TTL policy per key class.
#[derive(Clone, Copy)]
pub struct CacheTtl {
    pub papers: Duration,
    pub summary: Duration,
    pub rate_limit: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            papers: Duration::from_secs(7200),
            summary: Duration::from_secs(86400),
            rate_limit: Duration::from_secs(3600),
        }
    }
}

pub struct PaperCache {
    store: Arc<dyn KeyValueStore>,
    ttl: CacheTtl,
}

impl PaperCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_ttl(store, CacheTtl::default())
    }

    pub fn with_ttl(store: Arc<dyn KeyValueStore>, ttl: CacheTtl) -> Self {
        Self { store, ttl }
    }

    fn papers_key(source: Source) -> &'static str {
        match source {
            Source::Arxiv => ARXIV_PAPERS_KEY,
            Source::Huggingface => HF_PAPERS_KEY,
        }
    }

    fn summary_key(paper_id: &str) -> String {
        format!("summaries:{}", paper_id)
    }

    fn rate_limit_key(actor: &str) -> String {
        format!("ratelimit:{}", actor)
    }

    /// Cached list for a source, or None when absent or expired.
    pub async fn papers(&self, source: Source) -> Result<Option<Vec<Paper>>> {
        match self.store.get(Self::papers_key(source)).await {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Replaces the whole cached list for a source.
    pub async fn set_papers(&self, source: Source, papers: &[Paper]) -> Result<()> {
        let raw = serde_json::to_string(papers)?;
        self.store
            .set(Self::papers_key(source), raw, self.ttl.papers)
            .await;
        Ok(())
    }

    pub async fn summary(&self, paper_id: &str) -> Option<String> {
        self.store.get(&Self::summary_key(paper_id)).await
    }

    pub async fn set_summary(&self, paper_id: &str, summary: &str) {
        self.store
            .set(
                &Self::summary_key(paper_id),
                summary.to_string(),
                self.ttl.summary,
            )
            .await;
    }

    /// Fixed-window rate limit check: increments the actor's counter, sets
    /// the window TTL on the first hit, and admits the call iff the counter
    /// is within `limit`. The window resets only on expiry; exceeding the
    /// limit does not restart it.
    pub async fn check_rate_limit(&self, actor: &str, limit: i64) -> bool {
        let key = Self::rate_limit_key(actor);
        let current = self.store.incr(&key).await;

        if current == 1 {
            self.store.expire(&key, self.ttl.rate_limit).await;
        }

        current <= limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Paper;
    use crate::store::MemoryStore;

    fn sample_paper(id: &str) -> Paper {
        Paper {
            id: id.to_string(),
            source: Source::Arxiv,
            title: "Sample".to_string(),
            authors: vec!["A. Author".to_string()],
            abstract_text: String::new(),
            published: "2024-01-01T00:00:00Z".to_string(),
            ranking: 1,
            upvotes: None,
            link: format!("https://arxiv.org/abs/{}", id),
            html_url: None,
            summary: None,
            summary_generated_at: None,
        }
    }

    fn cache() -> PaperCache {
        PaperCache::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_papers_roundtrip() {
        let cache = cache();
        assert!(cache.papers(Source::Arxiv).await.unwrap().is_none());

        cache
            .set_papers(Source::Arxiv, &[sample_paper("2401.00001")])
            .await
            .unwrap();

        let papers = cache.papers(Source::Arxiv).await.unwrap().unwrap();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].id, "2401.00001");
    }

    #[tokio::test]
    async fn test_set_papers_replaces_whole_list() {
        let cache = cache();
        cache
            .set_papers(
                Source::Arxiv,
                &[sample_paper("old.1"), sample_paper("old.2")],
            )
            .await
            .unwrap();
        cache
            .set_papers(Source::Arxiv, &[sample_paper("new.1")])
            .await
            .unwrap();

        let papers = cache.papers(Source::Arxiv).await.unwrap().unwrap();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].id, "new.1");
    }

    #[tokio::test]
    async fn test_sources_are_independent_slots() {
        let cache = cache();
        cache
            .set_papers(Source::Arxiv, &[sample_paper("a")])
            .await
            .unwrap();
        assert!(cache.papers(Source::Huggingface).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_summary_roundtrip() {
        let cache = cache();
        assert!(cache.summary("p1").await.is_none());
        cache.set_summary("p1", "a summary").await;
        assert_eq!(cache.summary("p1").await.as_deref(), Some("a summary"));
    }

    #[tokio::test]
    async fn test_rate_limit_window() {
        let cache = cache();
        let mut admitted = Vec::new();
        for _ in 0..4 {
            admitted.push(cache.check_rate_limit("k", 3).await);
        }
        assert_eq!(admitted, vec![true, true, true, false]);
    }

    #[tokio::test]
    async fn test_rate_limit_resets_on_expiry() {
        let store = Arc::new(MemoryStore::new());
        let cache = PaperCache::with_ttl(
            store,
            CacheTtl {
                rate_limit: Duration::from_millis(20),
                ..CacheTtl::default()
            },
        );

        for _ in 0..4 {
            cache.check_rate_limit("k", 3).await;
        }
        assert!(!cache.check_rate_limit("k", 3).await);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(cache.check_rate_limit("k", 3).await);
    }

    #[tokio::test]
    async fn test_rate_limit_actors_are_independent() {
        let cache = cache();
        assert!(cache.check_rate_limit("a", 1).await);
        assert!(!cache.check_rate_limit("a", 1).await);
        assert!(cache.check_rate_limit("b", 1).await);
    }
}
