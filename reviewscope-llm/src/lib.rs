//! Reviewscope LLM - Chunking and Hierarchical Summarization
//!
//! This crate lets an LLM with a fixed context window summarize an unbounded
//! number of reviews: a tokenizer seam measures text, the chunk planner
//! partitions it under a token budget without ever splitting an item, and the
//! summarizer maps chunks through the model independently before reducing the
//! partial outputs into one final summary.

#![warn(clippy::all)]

pub mod chunker;
pub mod client;
pub mod prompts;
pub mod summarizer;
pub mod tokenizer;

// Re-export main types for convenience
pub use chunker::{Chunk, ChunkPlanner};
pub use client::LlmClient;
pub use summarizer::{Summarizer, SummarizerConfig};
pub use tokenizer::{CharEstimator, TokenCounter, WordTokenizer};

use async_trait::async_trait;

/// Result type for LLM operations
pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// Error types for LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The inference call failed or returned an error payload
    #[error("Inference error: {0}")]
    Inference(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// One-shot text completion seam.
///
/// The summarizer only ever needs "prompt in, generated text out"; anything
/// implementing this can stand in for the hosted model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Issue one inference call and return the generated text
    async fn generate(&self, prompt: &str) -> LlmResult<String>;
}
