//! Full-text content extraction for summarization input.
//!
//! Assembles a bounded markdown-ish text from an arXiv HTML paper page:
//! title line, abstract blocks, then each section heading with its following
//! sibling content. The bound keeps the summarization prompt inside the
//! model's context budget.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{arxiv::HTML_BASE, fetch_html, truncate_chars};
use crate::error::Result;

pub const MAX_CONTENT_CHARS: usize = 15_000;

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("h1 selector"));
static ABSTRACT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".abstract").expect("abstract selector"));
static SECTION_HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section h2, .ltx_title").expect("section heading selector"));

/// Fetches a paper's HTML rendition and extracts its text. Non-success
/// status fails; a page with nothing extractable yields an empty string,
/// which callers must treat as "no content available".
pub async fn fetch_paper_content(paper_id: &str) -> Result<String> {
    let url = format!("{}{}", HTML_BASE, paper_id);
    let html = fetch_html(&url, "arxiv html").await?;
    Ok(extract_content(&html))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn is_section_heading(el: &ElementRef<'_>) -> bool {
    el.value().name() == "h2" || el.value().classes().any(|c| c == "ltx_title")
}

/// Text of every following sibling up to the next section heading.
fn section_body(heading: ElementRef<'_>) -> String {
    let mut pieces: Vec<String> = Vec::new();
    for node in heading.next_siblings() {
        if let Some(el) = ElementRef::wrap(node) {
            if is_section_heading(&el) {
                break;
            }
            let text = text_of(el);
            if !text.is_empty() {
                pieces.push(text);
            }
        } else if let Some(text) = node.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed.to_string());
            }
        }
    }
    pieces.join("\n")
}

/// Pure extraction over a fetched page; never fails, empty input yields an
/// empty string.
pub fn extract_content(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<String> = Vec::new();

    if let Some(title) = document.select(&H1).next().map(text_of) {
        if !title.is_empty() {
            parts.push(format!("# {}\n", title));
        }
    }

    for el in document.select(&ABSTRACT) {
        let text = text_of(el);
        if !text.is_empty() {
            parts.push(text);
        }
    }

    for heading in document.select(&SECTION_HEADING) {
        let title = text_of(heading);
        let body = section_body(heading);
        if !title.is_empty() && !body.is_empty() {
            parts.push(format!("\n## {}\n{}", title, body));
        }
    }

    truncate_chars(&parts.join("\n\n"), MAX_CONTENT_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTIONED_PAGE: &str = r#"
        <html><body>
            <h1>Attention Is All You Need</h1>
            <div class="abstract">We propose the Transformer.</div>
            <section>
                <h2>Introduction</h2>
                <p>Sequence transduction models dominate.</p>
                <p>Recurrence is a bottleneck.</p>
                <h2>Model Architecture</h2>
                <p>Stacked self-attention layers.</p>
            </section>
        </body></html>
    "#;

    #[test]
    fn test_assembles_title_abstract_and_sections() {
        let content = extract_content(SECTIONED_PAGE);

        assert!(content.starts_with("# Attention Is All You Need"));
        assert!(content.contains("We propose the Transformer."));
        assert!(content.contains("## Introduction"));
        assert!(content.contains("Sequence transduction models dominate."));
        assert!(content.contains("## Model Architecture"));
        assert!(content.contains("Stacked self-attention layers."));
    }

    #[test]
    fn test_section_body_stops_at_next_heading() {
        let content = extract_content(SECTIONED_PAGE);

        let intro_start = content.find("## Introduction").unwrap();
        let arch_start = content.find("## Model Architecture").unwrap();
        let intro = &content[intro_start..arch_start];
        assert!(intro.contains("Recurrence is a bottleneck."));
        assert!(!intro.contains("Stacked self-attention layers."));
    }

    #[test]
    fn test_ltx_title_headings_recognized() {
        let html = r#"<body>
            <div class="ltx_title">Results</div>
            <p>The model converges.</p>
        </body>"#;
        let content = extract_content(html);
        assert!(content.contains("## Results"));
        assert!(content.contains("The model converges."));
    }

    #[test]
    fn test_page_without_matching_sections_is_empty() {
        let html = "<html><body><div>nothing recognizable</div></body></html>";
        assert_eq!(extract_content(html), "");
    }

    #[test]
    fn test_empty_document_is_empty() {
        assert_eq!(extract_content(""), "");
    }

    #[test]
    fn test_truncates_to_content_bound() {
        let body: String = (0..2000)
            .map(|i| format!("<div class=\"abstract\">Paragraph number {} padded out.</div>", i))
            .collect();
        let html = format!("<html><body>{}</body></html>", body);

        let content = extract_content(&html);
        assert_eq!(content.chars().count(), MAX_CONTENT_CHARS);
    }
}
