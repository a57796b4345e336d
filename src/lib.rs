pub mod aggregate;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod scrape;
pub mod store;
pub mod summary;

use std::sync::Arc;

use cache::PaperCache;
use config::Config;
use llm::Summarizer;
use summary::ContentProvider;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<PaperCache>,
    pub summarizer: Arc<dyn Summarizer>,
    pub content: Arc<dyn ContentProvider>,
}
