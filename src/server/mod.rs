//! HTTP server exposing the analysis endpoint.
//!
//! - `POST /analyze-content` runs one analysis and returns
//!   [`crate::AnalysisResult`] or a `{ error, details? }` envelope
//! - `GET /health` reports whether a credential is currently visible
//! - `OPTIONS` on any route answers a CORS preflight with permissive headers

mod handlers;
mod routes;

pub use handlers::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::pipeline::llm::{CompletionProvider, OpenAiProvider};

/// Shared state for the web server. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AnalyzerConfig>,
    pub provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    /// State backed by the OpenAI-compatible provider described by `config`.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let provider = OpenAiProvider::new(&config)?;
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    pub fn with_provider(config: AnalyzerConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}

/// Start the web server and run until the listener fails.
pub async fn serve(config: AnalyzerConfig, host: &str, port: u16) -> std::io::Result<()> {
    let state = AppState::new(config).map_err(std::io::Error::other)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
