use super::errors::ApiError;
use super::extract::JsonBody;
use super::types::*;
use crate::auth::{TokenVerifier, VerifiedUser};
use crate::provider::{CompletionRequest, Provider};
use crate::rag::{self, RagEngine, UploadRequest};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: RagEngine,
    pub provider: Arc<dyn Provider>,
    /// `None` when no identity provider is configured; protected routes then refuse every token.
    pub verifier: Option<Arc<dyn TokenVerifier>>,
    pub model: String,
    pub default_top_k: usize,
}

pub async fn index() -> &'static str {
    "ConstituCheck Backend is running!"
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "constitucheck".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        documents: state.engine.count(),
    })
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}

pub async fn search(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = request
        .query
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("query is required".to_string()))?;

    let top_k = request.top_k.unwrap_or(state.default_top_k);
    if top_k == 0 {
        return Err(ApiError::BadRequest(
            "top_k must be a positive integer".to_string(),
        ));
    }

    let results = state.engine.search(&query, top_k);

    Ok(Json(SearchResponse {
        status: "ok".to_string(),
        query,
        top_k,
        results: results.into_iter().map(SearchHit::from).collect(),
    }))
}

pub async fn upload(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let has_field = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());
    if !has_field(&request.title) || !has_field(&request.content) {
        return Err(ApiError::BadRequest(
            "title and content required".to_string(),
        ));
    }

    let receipt = state.engine.accept_upload(&request);

    Ok(Json(UploadResponse {
        status: "ok".to_string(),
        doc_id: receipt.doc_id,
        message: receipt.message,
    }))
}

pub async fn complete(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
    JsonBody(request): JsonBody<CompleteRequest>,
) -> Result<Json<CompleteResponse>, ApiError> {
    let prompt = request
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("prompt required".to_string()))?;

    info!(uid = %user.uid, "Completion requested");
    let data = generate(&state, prompt).await?;

    Ok(Json(CompleteResponse {
        status: "ok".to_string(),
        data,
    }))
}

/// Grounds a scenario on the best-matching document and asks the model for an analysis.
pub async fn analyze(
    State(state): State<AppState>,
    Extension(user): Extension<VerifiedUser>,
    JsonBody(request): JsonBody<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let scenario = request
        .scenario
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("scenario required".to_string()))?;

    let best = state
        .engine
        .search(&scenario, 1)
        .into_iter()
        .next()
        .filter(|best| best.score > 0.0)
        .ok_or_else(|| ApiError::NotFound("no relevant document found".to_string()))?;

    info!(uid = %user.uid, doc_id = %best.document.id, score = best.score, "Analysis requested");
    let prompt = rag::build_analysis_prompt(&scenario, &best.document);
    let data = generate(&state, prompt).await?;

    Ok(Json(AnalyzeResponse {
        status: "ok".to_string(),
        document: DocumentRef::from(&best),
        data,
    }))
}

async fn generate(state: &AppState, prompt: String) -> Result<String, ApiError> {
    state
        .provider
        .complete(CompletionRequest::new(&state.model, prompt))
        .await
        .map(|response| response.text)
        .map_err(|e| {
            error!("LLM call failed: {}", e);
            ApiError::Internal("LLM call failed".to_string())
        })
}
