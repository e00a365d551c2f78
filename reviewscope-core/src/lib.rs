//! Reviewscope Core - Shared Data Model and Settings
//!
//! This crate holds the types that travel between the collection and
//! summarization pipelines: provider review records, place metadata, the
//! persisted collection document, and the process-wide settings that are
//! built once from the environment at startup.

#![warn(clippy::all)]

pub mod models;
pub mod settings;

// Re-export main types for convenience
pub use models::{
    Branch, CollectionDocument, PlaceInfo, Review, ReviewUser, load_collection_inputs,
    review_texts,
};
pub use settings::{LlmSettings, SerpApiSettings, Settings};

/// Result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Error types for core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Caller-supplied data violates a precondition
    #[error("Input error: {0}")]
    Input(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
