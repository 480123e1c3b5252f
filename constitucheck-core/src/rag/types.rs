use serde::{Deserialize, Serialize};

/// A document in the search corpus.
///
/// Documents are the unit of retrieval. Each one carries the full text used
/// for scoring plus a title and category that are echoed back to callers.
/// `id` identifies the document; uniqueness within a corpus is assumed but
/// not checked.
///
/// # Example
///
/// ```
/// use constitucheck_core::rag::Document;
///
/// let doc = Document::new(
///     "doc-9",
///     "Evidence Act - Hearsay",
///     "Hearsay evidence is generally inadmissible.",
///     "Evidence",
/// );
/// assert_eq!(doc.id, "doc-9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            category: category.into(),
        }
    }
}

/// A ranked document and its relevance score.
///
/// Returned by [`rank_top_k`](super::rank_top_k) ordered by descending score.
///
/// # Score Range
///
/// Scores are the fraction of query tokens found in the document, so they
/// always lie in `0.0..=1.0`:
/// - `1.0` - every query token appears in the document
/// - `0.0` - no query token appears in the document
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
    pub document: Document,
    pub score: f64,
}

/// Document submitted through the upload endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

/// Acknowledgement for an accepted upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    pub doc_id: String,
    pub message: String,
}
