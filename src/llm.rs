//! Streaming summarization client.
//!
//! The provider speaks newline-delimited `data: `-prefixed JSON events
//! terminated by a `[DONE]` sentinel. [`relay`] forwards each decoded text
//! delta to the caller immediately while accumulating the full summary for
//! the cache write that follows normal stream exhaustion.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Language;
use crate::scrape::truncate_chars;

const SYSTEM_PROMPT_EN: &str = "You are an AI assistant specialized in summarizing research papers. Summarize the provided paper in clear, concise bullet points.";
const SYSTEM_PROMPT_AR: &str = "أنت مساعد ذكاء اصطناعي متخصص في تلخيص الأبحاث العلمية. قم بتلخيص البحث المقدم في نقاط واضحة وموجزة باللغة العربية.";

const MAX_PROMPT_CHARS: usize = 15_000;

pub type TokenStream = BoxStream<'static, Result<Bytes>>;

/// Seam for the external summarizer so tests can substitute a scripted
/// stream and count upstream calls.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Opens a token-delta event stream summarizing `content`. Fails with
    /// `AppError::Summarization` on a non-success upstream status.
    async fn stream_summary(&self, content: &str, language: Language) -> Result<TokenStream>;
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct Thinking {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    thinking: Thinking,
    stream: bool,
    max_tokens: u32,
    temperature: f32,
}

pub struct ZaiClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl ZaiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.zai_api_key.clone(),
            api_base: config.zai_api_base.clone(),
            model: config.summary_model.clone(),
        }
    }
}

#[async_trait]
impl Summarizer for ZaiClient {
    async fn stream_summary(&self, content: &str, language: Language) -> Result<TokenStream> {
        let system = match language {
            Language::En => SYSTEM_PROMPT_EN,
            Language::Ar => SYSTEM_PROMPT_AR,
        };
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: system.to_string(),
                },
                Message {
                    role: "user",
                    content: format!(
                        "Please summarize this research paper:\n\n{}",
                        truncate_chars(content, MAX_PROMPT_CHARS)
                    ),
                },
            ],
            thinking: Thinking { kind: "enabled" },
            stream: true,
            max_tokens: 4096,
            temperature: 1.0,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Summarization {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(AppError::from))
            .boxed())
    }
}

/// Decodes one event line into its text delta. Returns None for the `[DONE]`
/// sentinel, non-`data:` lines, malformed JSON, and empty deltas — all of
/// which are skipped rather than aborting the stream.
pub fn delta_from_event(line: &str) -> Option<String> {
    let payload = line.strip_prefix("data: ")?.trim();
    if payload == "[DONE]" {
        return None;
    }
    let parsed: Value = serde_json::from_str(payload).ok()?;
    parsed["choices"][0]["delta"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Drains the upstream token stream, sending each decoded fragment through
/// `tx` as it arrives. Returns the accumulated full text once the stream is
/// exhausted, or None when the receiver was dropped (caller disconnected),
/// in which case the upstream is abandoned.
pub async fn relay(mut upstream: TokenStream, tx: &mpsc::Sender<String>) -> Option<String> {
    let mut full = String::new();
    let mut buf = String::new();

    while let Some(chunk) = upstream.next().await {
        let Ok(bytes) = chunk else {
            // Mid-stream transport error: stop reading, keep what arrived.
            break;
        };
        buf.push_str(&String::from_utf8_lossy(&bytes));

        while let Some(pos) = buf.find('\n') {
            let line: String = buf.drain(..=pos).collect();
            if let Some(fragment) = delta_from_event(line.trim()) {
                full.push_str(&fragment);
                if tx.send(fragment).await.is_err() {
                    return None;
                }
            }
        }
    }

    // Trailing event without a final newline.
    if let Some(fragment) = delta_from_event(buf.trim()) {
        full.push_str(&fragment);
        if tx.send(fragment).await.is_err() {
            return None;
        }
    }

    Some(full)
}
