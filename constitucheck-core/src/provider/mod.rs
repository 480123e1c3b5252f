//! LLM provider abstraction layer.
//!
//! This module defines a common interface for text generation backends so the
//! server can forward prompts without knowing which API sits behind them.

mod types;
pub mod gemini;

// Re-export common types
pub use types::{
    CompletionRequest,
    CompletionResponse,
    Provider,
    ProviderError,
    Result,
};

// Re-export provider implementations
pub use gemini::GeminiProvider;
