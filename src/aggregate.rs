//! Merging of the cached per-source lists for the combined view.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::cmp::Reverse;

use crate::models::Paper;

/// Best-effort timestamp parse: RFC 3339, then a bare date, else the epoch.
/// Unparseable values all compare equal, so their relative order survives
/// the stable sort.
fn parse_published(value: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        return date.and_time(NaiveTime::MIN).and_utc();
    }
    DateTime::<Utc>::UNIX_EPOCH
}

/// Concatenates both cached lists (absent list = empty) and sorts by
/// publication recency, newest first. The ordering is best-effort since
/// `published` may be an extraction-time fallback rather than a true date.
pub fn merge_papers(arxiv: Option<Vec<Paper>>, huggingface: Option<Vec<Paper>>) -> Vec<Paper> {
    let mut papers = arxiv.unwrap_or_default();
    papers.extend(huggingface.unwrap_or_default());
    papers.sort_by_cached_key(|p| Reverse(parse_published(&p.published)));
    papers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;

    fn paper(id: &str, source: Source, published: &str) -> Paper {
        Paper {
            id: id.to_string(),
            source,
            title: "Title".to_string(),
            authors: Vec::new(),
            abstract_text: String::new(),
            published: published.to_string(),
            ranking: 1,
            upvotes: None,
            link: String::new(),
            html_url: None,
            summary: None,
            summary_generated_at: None,
        }
    }

    #[test]
    fn test_merges_and_sorts_newest_first() {
        let arxiv = vec![paper("a1", Source::Arxiv, "2024-01-02")];
        let hf = vec![
            paper("h1", Source::Huggingface, "2024-01-03"),
            paper("h2", Source::Huggingface, "2024-01-01"),
        ];

        let merged = merge_papers(Some(arxiv), Some(hf));
        let order: Vec<&str> = merged.iter().map(|p| p.published.as_str()).collect();
        assert_eq!(order, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
    }

    #[test]
    fn test_absent_lists_are_empty() {
        assert!(merge_papers(None, None).is_empty());

        let merged = merge_papers(None, Some(vec![paper("h1", Source::Huggingface, "2024-01-01")]));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_equal_timestamps_preserve_relative_order() {
        let arxiv = vec![
            paper("a1", Source::Arxiv, "2024-01-01"),
            paper("a2", Source::Arxiv, "2024-01-01"),
        ];
        let hf = vec![paper("h1", Source::Huggingface, "2024-01-01")];

        let merged = merge_papers(Some(arxiv), Some(hf));
        let order: Vec<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["a1", "a2", "h1"]);
    }

    #[test]
    fn test_rfc3339_and_bare_dates_compare() {
        let arxiv = vec![paper("a1", Source::Arxiv, "2024-01-02T12:00:00Z")];
        let hf = vec![paper("h1", Source::Huggingface, "2024-01-02")];

        let merged = merge_papers(Some(arxiv), Some(hf));
        assert_eq!(merged[0].id, "a1"); // noon sorts ahead of midnight
    }

    #[test]
    fn test_unparseable_dates_sink_to_the_end() {
        let arxiv = vec![paper("a1", Source::Arxiv, "Mon, 1 Jan 2024")];
        let hf = vec![paper("h1", Source::Huggingface, "2024-01-01")];

        let merged = merge_papers(Some(arxiv), Some(hf));
        assert_eq!(merged[0].id, "h1");
        assert_eq!(merged[1].id, "a1");
    }
}
