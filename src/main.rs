use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use paper_pulse::{
    api::routes::create_router,
    cache::PaperCache,
    config::Config,
    llm::ZaiClient,
    store::MemoryStore,
    summary::ArxivContent,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;

    let store = Arc::new(MemoryStore::new());
    let app_state = AppState {
        summarizer: Arc::new(ZaiClient::new(&config)),
        content: Arc::new(ArxivContent),
        cache: Arc::new(PaperCache::new(store)),
        config: Arc::new(config),
    };

    // Build the router with routes
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!(%server_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
