//! HTML fetching and the per-source listing extractors.
//!
//! Each source's extraction is a pure `(html) -> Vec<Paper>` function so page
//! markup changes stay contained and the parsers are testable against fixture
//! pages without network access.

pub mod arxiv;
pub mod content;
pub mod huggingface;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::error::{AppError, Result};

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .user_agent("Mozilla/5.0 (compatible; ResearchBot/1.0)")
        .build()
        .expect("Failed to build HTTP client")
});

static AUTHOR_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i),|\sand\s").expect("Failed to parse author split regex"));

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("Failed to parse number regex"));

/// Fetches a page, failing on any non-success status. No retries.
pub async fn fetch_html(url: &str, context: &str) -> Result<String> {
    let response = CLIENT.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Fetch {
            status: status.as_u16(),
            context: context.to_string(),
        });
    }
    let html = response.text().await?;
    Ok(html)
}

/// Splits an authors blob on commas or the word "and", dropping empty parts.
pub fn split_authors(text: &str) -> Vec<String> {
    AUTHOR_SPLIT
        .split(text)
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

/// First run of digits anywhere in the text, if any.
pub fn first_number(text: &str) -> Option<u32> {
    NUMBER.find(text)?.as_str().parse().ok()
}

/// Truncates to at most `max` characters (not bytes), respecting char
/// boundaries.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    text.chars().take(max).collect()
}

/// Extraction-time fallback timestamp for pages that omit a date.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_authors_on_commas_and_and() {
        let authors = split_authors("Ada Lovelace, Alan Turing and Grace Hopper");
        assert_eq!(authors, vec!["Ada Lovelace", "Alan Turing", "Grace Hopper"]);
    }

    #[test]
    fn test_split_authors_drops_empty_parts() {
        let authors = split_authors("Ada Lovelace, , Alan Turing,");
        assert_eq!(authors, vec!["Ada Lovelace", "Alan Turing"]);
    }

    #[test]
    fn test_split_authors_case_insensitive_and() {
        let authors = split_authors("Ada Lovelace AND Alan Turing");
        assert_eq!(authors, vec!["Ada Lovelace", "Alan Turing"]);
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("upvote 42"), Some(42));
        assert_eq!(first_number("no digits"), None);
    }

    #[test]
    fn test_truncate_chars_exact_bound() {
        let long = "x".repeat(20_000);
        assert_eq!(truncate_chars(&long, 15_000).chars().count(), 15_000);
    }

    #[test]
    fn test_truncate_chars_short_input_untouched() {
        assert_eq!(truncate_chars("short", 15_000), "short");
    }

    #[test]
    fn test_truncate_chars_multibyte_boundary() {
        let text = "é".repeat(10);
        assert_eq!(truncate_chars(&text, 5).chars().count(), 5);
    }
}
