//! constitucheck - Backend gateway for the ConstituCheck legal assistant
//!
//! This is the convenience wrapper crate that re-exports the gateway
//! components.
//!
//! # Quick Start
//!
//! ```toml
//! [dependencies]
//! constitucheck = "0.1"
//! ```
//!
//! ```no_run
//! use constitucheck::{Config, Server};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env("config.yaml")?;
//! Server::new(config)?.start().await?;
//! # Ok(())
//! # }
//! ```

// Re-export core
pub use constitucheck_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use constitucheck_core::rag::{demo_corpus, normalize, rank_top_k, score};
    pub use constitucheck_core::{Config, Document, RagEngine, ScoredResult, Server};
}
