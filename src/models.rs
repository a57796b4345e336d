use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Where a paper listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Arxiv,
    Huggingface,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Arxiv => "arxiv",
            Source::Huggingface => "huggingface",
        }
    }

    /// Parses a client-supplied source value; unknown values are a client
    /// error, not a deserialization failure.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "arxiv" => Ok(Source::Arxiv),
            "huggingface" => Ok(Source::Huggingface),
            other => Err(AppError::InvalidSource(other.to_string())),
        }
    }
}

/// Summary output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
}

impl Default for Language {
    fn default() -> Self {
        Language::Ar
    }
}

/// One extracted paper listing entry.
///
/// `published` is best-effort: when the listing page carries no date it holds
/// the extraction time, not a true publication date. `summary` is populated
/// lazily by the summarization pipeline and is not required for validity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub id: String,
    pub source: Source,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub published: String,
    pub ranking: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<u32>,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_generated_at: Option<String>,
}

#[derive(Deserialize)]
pub struct PapersQuery {
    pub source: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PapersResponse {
    pub papers: Vec<Paper>,
    pub source: String,
    pub cached_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub source: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub count: usize,
    pub source: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    pub paper_id: String,
    pub source: Source,
    #[serde(default)]
    pub language: Language,
}

/// Per-source outcome of a scheduled refresh: a record count for a leg that
/// succeeded, an error string for one that failed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arxiv_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hf_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arxiv_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hf_error: Option<String>,
    pub timestamp: DateTime<Utc>,
}
