//! HTTP gateway for search, upload and completion requests.
//!
//! The server is organized into separate concerns:
//! - `types`: request and response bodies
//! - `handler`: business logic for each route
//! - `errors`: mapping of failures to JSON error responses

mod errors;
mod extract;
mod handler;
mod types;

pub use errors::ApiError;
pub use extract::JsonBody;
pub use handler::AppState;
pub use types::*;

use crate::auth::{self, bearer_token};
use crate::config::{Config, ServerConfig};
use crate::provider::{GeminiProvider, ProviderError};
use crate::rag::{CorpusError, RagEngine};
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{header, HeaderName, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Instrument};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load corpus: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Failed to create provider: {0}")]
    Provider(#[from] ProviderError),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Main server wiring configuration, state and the HTTP listener.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Creates a server from configuration.
    ///
    /// Loads the corpus, builds the generation provider and the token
    /// verifier. A missing identity credential is not an error; protected
    /// routes will answer 401 until one is configured.
    pub fn new(config: Config) -> Result<Self> {
        let engine = RagEngine::from_config(&config.search)?;
        let provider = GeminiProvider::new(&config.llm)?;
        if !provider.is_configured() {
            warn!("GEMINI_API_KEY not set, completions will return a placeholder");
        }
        let verifier = auth::verifier_from_config(&config.identity);

        let state = AppState {
            engine,
            provider: Arc::new(provider),
            verifier,
            model: config.llm.model.clone(),
            default_top_k: config.search.default_top_k,
        };

        Ok(Self::with_state(config.server, state))
    }

    /// Creates a server around prebuilt state.
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone(), &self.config)
    }

    /// Binds the listener and serves until Ctrl-C.
    pub async fn start(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        info!("ConstituCheck gateway listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutting down...");
}

/// Builds the router with all routes and middleware layers.
///
/// `POST /search`, `/upload`, `/complete` and `/analyze` sit behind bearer
/// authentication; `/health` and `/` do not. Routes other than `/` are
/// mounted under `server.route_prefix`. Unknown paths and known paths hit
/// with the wrong method both get the `Route not found` body, without
/// authentication.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let routes = Router::new()
        .route("/health", get(handler::health))
        .route("/search", post(handler::search).route_layer(auth.clone()))
        .route("/upload", post(handler::upload).route_layer(auth.clone()))
        .route("/complete", post(handler::complete).route_layer(auth.clone()))
        .route("/analyze", post(handler::analyze).route_layer(auth))
        .method_not_allowed_fallback(handler::not_found);

    let root = Router::new()
        .route("/", get(handler::index))
        .method_not_allowed_fallback(handler::not_found);
    let prefix = config.route_prefix.trim_end_matches('/');
    let app = if prefix.is_empty() {
        root.merge(routes)
    } else if prefix.starts_with('/') {
        root.nest(prefix, routes)
    } else {
        root.nest(&format!("/{prefix}"), routes)
    };

    app.fallback(handler::not_found)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .with_state(state)
}

async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let token = bearer_token(
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    )
    .map(str::to_string)
    .ok_or_else(|| ApiError::Unauthorized("Missing or invalid Authorization header".to_string()))?;

    let Some(verifier) = &state.verifier else {
        warn!("Token verification unavailable: no identity provider configured");
        return Err(ApiError::Unauthorized("Invalid auth token".to_string()));
    };

    let user = verifier.verify(&token).await.map_err(|e| {
        warn!("Token verify failed: {}", e);
        ApiError::Unauthorized("Invalid auth token".to_string())
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("request", request_id = %request_id);
    async move {
        let mut response = next.run(req).await;
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static("x-request-id"), value);
        }
        response
    }
    .instrument(span)
    .await
}
