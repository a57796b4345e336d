//! Hugging Face trending-papers listing extractor.
//!
//! The trending page has no stable semantic markup, so extraction is
//! best-effort: anchors to `/papers/{id}` are the candidates, and the
//! surrounding card is probed with class-substring selectors for the rest.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

use super::{fetch_html, first_number, now_timestamp, split_authors};
use crate::error::Result;
use crate::models::{Paper, Source};

const TRENDING_URL: &str = "https://huggingface.co/papers/trending";
const HF_BASE: &str = "https://huggingface.co";
const MIN_TITLE_CHARS: usize = 5;

static PAPER_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/papers/"]"#).expect("paper link selector"));
static CARD_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2, h3, .paper-title").expect("card title selector"));
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h2, h3").expect("heading selector"));
static VOTES: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[class*="like"], [class*="vote"], button"#).expect("votes selector")
});
static AUTHORS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[class*="author"]"#).expect("authors selector"));
static ABSTRACT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[class*="abstract"], [class*="summary"], p"#).expect("abstract selector")
});
static DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[class*="date"], time, span"#).expect("date selector"));

/// Fetches the trending page and extracts up to `max_results` papers.
pub async fn fetch_papers(max_results: usize) -> Result<Vec<Paper>> {
    let html = fetch_html(TRENDING_URL, "huggingface trending").await?;
    Ok(extract_papers(&html, max_results))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Nearest enclosing card-like container: an `article` or any ancestor whose
/// class mentions "paper". Falls back to the anchor itself.
fn closest_card<'a>(anchor: ElementRef<'a>) -> ElementRef<'a> {
    for node in anchor.ancestors() {
        if let Some(el) = ElementRef::wrap(node) {
            let is_article = el.value().name() == "article";
            let paper_class = el
                .value()
                .attr("class")
                .is_some_and(|c| c.contains("paper"));
            if is_article || paper_class {
                return el;
            }
        }
    }
    anchor
}

/// Walks `/papers/{id}` anchors in page order. Candidates with the literal
/// "trending" pseudo-id, a duplicate id, or a title under five characters are
/// skipped and do not consume a rank.
pub fn extract_papers(html: &str, max_results: usize) -> Vec<Paper> {
    let document = Html::parse_document(html);
    let mut papers: Vec<Paper> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for anchor in document.select(&PAPER_LINK) {
        if papers.len() >= max_results {
            break;
        }

        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href == "/papers/trending" {
            continue;
        }
        let id = href
            .rsplit("/papers/")
            .next()
            .and_then(|tail| tail.split('?').next())
            .unwrap_or_default()
            .to_string();
        if id.is_empty() || !seen.insert(id.clone()) {
            continue;
        }

        let card = closest_card(anchor);

        let title = card
            .select(&CARD_TITLE)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty())
            .or_else(|| {
                anchor
                    .select(&HEADING)
                    .next()
                    .map(text_of)
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or_else(|| text_of(anchor));
        if title.chars().count() < MIN_TITLE_CHARS {
            continue;
        }

        let upvotes = card
            .select(&VOTES)
            .filter_map(|el| first_number(&text_of(el)))
            .next()
            .unwrap_or(0);

        let authors = card
            .select(&AUTHORS)
            .next()
            .map(|el| split_authors(&text_of(el)))
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| vec!["Unknown".to_string()]);

        let abstract_text = card
            .select(&ABSTRACT)
            .next()
            .map(text_of)
            .unwrap_or_default();

        let published = card
            .select(&DATE)
            .next()
            .map(text_of)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(now_timestamp);

        papers.push(Paper {
            link: format!("{}{}", HF_BASE, href),
            html_url: Some(format!("{}{}", HF_BASE, href)),
            source: Source::Huggingface,
            title,
            authors,
            abstract_text,
            published,
            ranking: papers.len() + 1,
            upvotes: Some(upvotes),
            summary: None,
            summary_generated_at: None,
            id,
        });
    }

    papers
}
