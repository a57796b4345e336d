use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Non-success HTTP status from an external page. Not retried.
    #[error("Fetch failed ({context}): status {status}")]
    Fetch { status: u16, context: String },

    #[error("No content available for summarization")]
    NoContent,

    /// Non-success status from the summarization provider.
    #[error("Summarizer error: {status} - {body}")]
    Summarization { status: u16, body: String },

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid source \"{0}\". Use \"arxiv\" or \"huggingface\".")]
    InvalidSource(String),

    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Fetch { .. } | AppError::Http(_) => StatusCode::BAD_GATEWAY,
            AppError::NoContent | AppError::InvalidSource(_) => StatusCode::BAD_REQUEST,
            AppError::Summarization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Config(_) | AppError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Cache(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
