use crate::rag::ScoredResult;
use serde::{Deserialize, Serialize};

/// Body of `POST /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub top_k: Option<usize>,
}

/// Body of `POST /complete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteRequest {
    pub prompt: Option<String>,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub scenario: Option<String>,
}

/// A ranked document as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub title: String,
    pub category: String,
    pub score: f64,
    pub content: String,
}

impl From<ScoredResult> for SearchHit {
    fn from(result: ScoredResult) -> Self {
        Self {
            doc_id: result.document.id,
            title: result.document.title,
            category: result.document.category,
            score: result.score,
            content: result.document.content,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: String,
    pub query: String,
    pub top_k: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub doc_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteResponse {
    pub status: String,
    pub data: String,
}

/// The document an analysis was grounded on, without its full text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub doc_id: String,
    pub title: String,
    pub category: String,
    pub score: f64,
}

impl From<&ScoredResult> for DocumentRef {
    fn from(result: &ScoredResult) -> Self {
        Self {
            doc_id: result.document.id.clone(),
            title: result.document.title.clone(),
            category: result.document.category.clone(),
            score: result.score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub document: DocumentRef,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub documents: usize,
}
