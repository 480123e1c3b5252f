//! Document retrieval for the legal assistant.
//!
//! Retrieval here is lexical: documents are ranked by how many of the query's
//! words they contain (see [`scorer`]). The corpus is injected when the
//! engine is built, so the same scoring runs over the demo documents, a file,
//! or a test fixture.
//!
//! # Components
//!
//! - [`scorer`]: tokenization, scoring and top-k ranking
//! - [`corpus`]: the built-in demo corpus and file loading
//! - [`RagEngine`]: shared handle used by the server and the CLI

pub mod corpus;
pub mod scorer;
mod types;

pub use corpus::{demo_corpus, load_corpus, CorpusError};
pub use scorer::{normalize, rank_top_k, score};
pub use types::{Document, ScoredResult, UploadReceipt, UploadRequest};

use crate::config::SearchConfig;
use std::sync::Arc;
use tracing::{debug, info};

/// Read-only retrieval engine over a shared corpus.
///
/// Cloning is cheap: clones share the same corpus.
#[derive(Debug, Clone)]
pub struct RagEngine {
    corpus: Arc<[Document]>,
}

impl RagEngine {
    pub fn new(corpus: Vec<Document>) -> Self {
        Self {
            corpus: corpus.into(),
        }
    }

    /// Builds an engine from the search configuration.
    ///
    /// Uses `search.corpus_path` when set, otherwise the demo corpus.
    pub fn from_config(config: &SearchConfig) -> corpus::Result<Self> {
        let documents = match &config.corpus_path {
            Some(path) => {
                let documents = load_corpus(path)?;
                info!(path = %path, documents = documents.len(), "Loaded corpus file");
                documents
            }
            None => demo_corpus(),
        };
        Ok(Self::new(documents))
    }

    /// Ranks the corpus against `query`, returning at most `top_k` results.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<ScoredResult> {
        let results = rank_top_k(query, &self.corpus, top_k);
        for result in &results {
            debug!(doc_id = %result.document.id, score = result.score, "Ranked document");
        }
        results
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.corpus.iter().find(|doc| doc.id == id)
    }

    pub fn documents(&self) -> &[Document] {
        &self.corpus
    }

    pub fn count(&self) -> usize {
        self.corpus.len()
    }

    /// Accepts an uploaded document.
    ///
    /// Uploads are acknowledged with a synthesized id and are neither stored
    /// nor added to the corpus.
    pub fn accept_upload(&self, request: &UploadRequest) -> UploadReceipt {
        let doc_id = format!("demo-{}", chrono::Utc::now().timestamp_millis());
        info!(
            doc_id = %doc_id,
            title = request.title.as_deref().unwrap_or_default(),
            "Accepted upload"
        );
        UploadReceipt {
            doc_id,
            message: "Document accepted (demo mode). In production this triggers vectorization."
                .to_string(),
        }
    }
}

/// Builds the prompt asking the model to analyse a scenario against a document.
pub fn build_analysis_prompt(scenario: &str, document: &Document) -> String {
    format!(
        "Scenario:\n{scenario}\n\n\
         Context Document:\n{title}\n{content}\n\n\
         Question: Based on the above scenario and the attached document, provide a brief \
         analysis of my scenario against the document.\n\
         Act as my lawyer, not an AI chatbot. Keep answers short and avoid disclaimers or \
         unnecessary details.",
        title = document.title,
        content = document.content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_demo_corpus() {
        let engine = RagEngine::new(demo_corpus());
        let results = engine.search("privacy", 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id, "doc-2");
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn test_search_arrest_query() {
        let engine = RagEngine::new(demo_corpus());
        let results = engine.search("Can police arrest me without a warrant?", 3);
        assert_eq!(results[0].document.id, "doc-3");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_document_lookup() {
        let engine = RagEngine::new(demo_corpus());
        assert_eq!(engine.count(), 3);
        assert!(engine.document("doc-1").is_some());
        assert!(engine.document("doc-404").is_none());
    }

    #[test]
    fn test_from_config_defaults_to_demo() {
        let engine = RagEngine::from_config(&SearchConfig::default()).unwrap();
        assert_eq!(engine.documents(), demo_corpus().as_slice());
    }

    #[test]
    fn test_accept_upload_synthesizes_id() {
        let engine = RagEngine::new(demo_corpus());
        let receipt = engine.accept_upload(&UploadRequest {
            title: Some("New Act".into()),
            content: Some("text".into()),
            category: None,
        });
        assert!(receipt.doc_id.starts_with("demo-"));
        assert!(receipt.doc_id["demo-".len()..].parse::<i64>().is_ok());
        assert_eq!(engine.count(), 3);
    }

    #[test]
    fn test_build_analysis_prompt() {
        let doc = Document::new("d", "Privacy", "Correspondence is private.", "Rights");
        let prompt = build_analysis_prompt("My letters were opened.", &doc);
        assert!(prompt.starts_with("Scenario:\nMy letters were opened."));
        assert!(prompt.contains("Context Document:\nPrivacy\nCorrespondence is private."));
        assert!(prompt.contains("Act as my lawyer"));
    }
}
