//! arXiv "new submissions" listing extractor.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

use super::{fetch_html, now_timestamp, split_authors};
use crate::error::Result;
use crate::models::{Paper, Source};

const NEW_LISTINGS_URL: &str = "https://arxiv.org/list/cs.AI/new";
pub const HTML_BASE: &str = "https://arxiv.org/html/";

static DL: Lazy<Selector> = Lazy::new(|| Selector::parse("dl").expect("dl selector"));
static DT: Lazy<Selector> = Lazy::new(|| Selector::parse("dt").expect("dt selector"));
static DD: Lazy<Selector> = Lazy::new(|| Selector::parse("dd").expect("dd selector"));
static ABS_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href*="/abs/"]"#).expect("abs link selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("anchor selector"));
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".list-title").expect("title selector"));
static AUTHORS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".list-authors").expect("authors selector"));
static ABSTRACT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".list-abstract").expect("abstract selector"));
static SUBMISSION_DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".list-submission-date").expect("submission date selector"));

/// Fetches the cs.AI new-submissions page and extracts up to `max_results`
/// papers.
pub async fn fetch_papers(max_results: usize) -> Result<Vec<Paper>> {
    let html = fetch_html(NEW_LISTINGS_URL, "arxiv listing").await?;
    Ok(extract_papers(&html, max_results))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Walks `dl` candidate nodes in page order, pairing each node's first `dt`
/// (title/metadata) with its first `dd` (abstract). Candidates without an
/// `/abs/{id}` link or a title are skipped and do not consume a rank.
pub fn extract_papers(html: &str, max_results: usize) -> Vec<Paper> {
    let document = Html::parse_document(html);
    let mut papers: Vec<Paper> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for dl in document.select(&DL) {
        if papers.len() >= max_results {
            break;
        }

        let Some(dt) = dl.select(&DT).next() else {
            continue;
        };
        let dd = dl.select(&DD).next();

        let Some(id) = dt
            .select(&ABS_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| href.rsplit("/abs/").next())
            .map(str::to_string)
        else {
            continue;
        };
        if id.is_empty() || !seen.insert(id.clone()) {
            continue;
        }

        let title = dt
            .select(&TITLE)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty())
            .or_else(|| dt.select(&ANCHOR).next().map(text_of))
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        let authors = dt
            .select(&AUTHORS)
            .next()
            .map(|el| split_authors(&text_of(el)))
            .unwrap_or_default();

        let abstract_text = dd
            .and_then(|dd| {
                dd.select(&ABSTRACT)
                    .next()
                    .map(text_of)
                    .filter(|a| !a.is_empty())
                    .or_else(|| Some(text_of(dd)))
            })
            .unwrap_or_default();

        let published = dt
            .select(&SUBMISSION_DATE)
            .next()
            .map(text_of)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(now_timestamp);

        papers.push(Paper {
            link: format!("https://arxiv.org/abs/{}", id),
            html_url: Some(format!("{}{}", HTML_BASE, id)),
            source: Source::Arxiv,
            title,
            authors,
            abstract_text,
            published,
            ranking: papers.len() + 1,
            upvotes: None,
            summary: None,
            summary_generated_at: None,
            id,
        });
    }

    papers
}
