//! constitucheck-core - Gateway for the ConstituCheck legal assistant
//!
//! Provides the components behind the HTTP API:
//! - Lexical document ranking over an injected corpus
//! - LLM provider abstraction for prompt completion
//! - Bearer token verification against an identity provider
//! - Configuration management
//! - Axum server (primary interface)
//!
//! ## Primary API
//!
//! Most users start a [`Server`] from a [`Config`]. The scorer in
//! [`rag::scorer`] is usable on its own.

// Public modules
pub mod auth;
pub mod config;
pub mod provider;
pub mod rag;
pub mod server;

// Public exports
pub use config::Config;
pub use rag::{rank_top_k, score, Document, RagEngine, ScoredResult};
pub use server::Server;

// Provider exports
pub use provider::{CompletionRequest, CompletionResponse, GeminiProvider, Provider, ProviderError};

// Auth exports
pub use auth::{StaticTokenVerifier, TokenVerifier, VerifiedUser};
