use axum::{
    body::Body,
    extract::{Json, Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use chrono::Utc;
use futures::StreamExt;
use std::convert::Infallible;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::aggregate::merge_papers;
use crate::error::{AppError, Result};
use crate::models::{
    CronResponse, PapersQuery, PapersResponse, RefreshRequest, RefreshResponse, Source,
    SummarizeRequest,
};
use crate::scrape::{arxiv, huggingface};
use crate::{summary, AppState};

/// Records fetched per source on a refresh.
const REFRESH_LIMIT: usize = 20;
/// Refresh calls admitted per actor per rate-limit window.
const REFRESH_RATE_LIMIT: i64 = 12;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/papers", get(papers_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/api/summarize", post(summarize_handler))
        .route("/api/cron/fetch-papers", get(cron_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn papers_handler(
    State(state): State<AppState>,
    Query(query): Query<PapersQuery>,
) -> Result<impl IntoResponse> {
    let source = query.source.as_deref().unwrap_or("all");

    let (papers, label) = if source == "all" {
        let (arxiv, hf) = tokio::join!(
            state.cache.papers(Source::Arxiv),
            state.cache.papers(Source::Huggingface),
        );
        (merge_papers(arxiv?, hf?), "all")
    } else {
        let source = Source::parse(source)?;
        let papers = state.cache.papers(source).await?.unwrap_or_default();
        (papers, source.as_str())
    };

    Ok(Json(PapersResponse {
        papers,
        source: label.to_string(),
        cached_at: Utc::now(),
    }))
}

/// Rate-limit actor identity from the forwarded-for header. Client-supplied
/// and spoofable, so this is an abuse deterrent, not a security control.
fn actor_key(headers: &HeaderMap) -> String {
    let actor = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous");
    format!("{}:refresh", actor)
}

async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse> {
    let actor = actor_key(&headers);
    if !state
        .cache
        .check_rate_limit(&actor, REFRESH_RATE_LIMIT)
        .await
    {
        warn!(%actor, "refresh rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    let source = Source::parse(&req.source)?;
    let papers = match source {
        Source::Arxiv => arxiv::fetch_papers(REFRESH_LIMIT).await?,
        Source::Huggingface => huggingface::fetch_papers(REFRESH_LIMIT).await?,
    };
    state.cache.set_papers(source, &papers).await?;
    info!(source = source.as_str(), count = papers.len(), "refreshed listing");

    Ok(Json(RefreshResponse {
        success: true,
        count: papers.len(),
        source: source.as_str().to_string(),
    }))
}

async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Result<impl IntoResponse> {
    let rx = summary::run(
        state.cache.clone(),
        state.content.clone(),
        state.summarizer.clone(),
        req,
    )
    .await?;

    let stream =
        ReceiverStream::new(rx).map(|fragment| Ok::<_, Infallible>(Bytes::from(fragment)));

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    ))
}

/// Scheduled refresh of both sources. The two fetches run concurrently and
/// independently: a failed leg is reported in the response without
/// discarding the successful side's result.
async fn cron_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let expected = format!("Bearer {}", state.config.cron_secret);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return Err(AppError::Unauthorized);
    }

    let (arxiv_result, hf_result) = tokio::join!(
        arxiv::fetch_papers(REFRESH_LIMIT),
        huggingface::fetch_papers(REFRESH_LIMIT),
    );

    let mut response = CronResponse {
        success: true,
        arxiv_count: None,
        hf_count: None,
        arxiv_error: None,
        hf_error: None,
        timestamp: Utc::now(),
    };

    match arxiv_result {
        Ok(papers) => {
            state.cache.set_papers(Source::Arxiv, &papers).await?;
            response.arxiv_count = Some(papers.len());
        }
        Err(err) => {
            warn!(%err, "scheduled arxiv refresh failed");
            response.success = false;
            response.arxiv_error = Some(err.to_string());
        }
    }

    match hf_result {
        Ok(papers) => {
            state.cache.set_papers(Source::Huggingface, &papers).await?;
            response.hf_count = Some(papers.len());
        }
        Err(err) => {
            warn!(%err, "scheduled huggingface refresh failed");
            response.success = false;
            response.hf_error = Some(err.to_string());
        }
    }

    info!(
        arxiv = ?response.arxiv_count,
        huggingface = ?response.hf_count,
        "scheduled refresh finished"
    );
    Ok(Json(response))
}
