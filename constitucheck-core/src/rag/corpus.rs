//! Corpus sources.
//!
//! The gateway ships with a three-document demo corpus. A different corpus can
//! be supplied as a JSON or YAML file holding a list of documents.

use super::types::Document;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a corpus file.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read corpus file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse corpus JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse corpus YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CorpusError>;

/// The built-in legal corpus used when no corpus file is configured.
pub fn demo_corpus() -> Vec<Document> {
    vec![
        Document::new(
            "doc-1",
            "Constitution Amendment - Free Speech",
            "Every citizen shall have freedom of speech and expression subject to reasonable \
             restrictions for public order and security.",
            "Fundamental Rights",
        ),
        Document::new(
            "doc-2",
            "Constitution Amendment - Right to Privacy",
            "The privacy of every individual's correspondence and personal information shall \
             be safeguarded by law, except as necessary for national security.",
            "Fundamental Rights",
        ),
        Document::new(
            "doc-3",
            "Criminal Procedure Act - Arrests",
            "Police may arrest without warrant where a person is reasonably suspected of \
             committing a cognizable offence and where delay would frustrate the investigation.",
            "Criminal Law",
        ),
    ]
}

/// Loads a corpus from disk.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
/// JSON. The file must contain a list of documents.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let documents = if is_yaml {
        serde_yaml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };

    Ok(documents)
}
