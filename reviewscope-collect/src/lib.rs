//! Reviewscope Collect - Provider Client and Review Collection
//!
//! This crate talks to the SerpApi-shaped place-search provider: API-key
//! validation, place lookup, branch search, and the pagination-following
//! loop that rebuilds a complete review list from bounded result pages.

#![warn(clippy::all)]

pub mod client;
pub mod collector;

// Re-export main types for convenience
pub use client::{PageCursor, Pagination, SearchResponse, SerpApiClient};
pub use collector::ReviewCollector;

/// Result type for collection operations
pub type CollectResult<T> = std::result::Result<T, CollectError>;

/// Error types for collection operations
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The provider reported an error field in a response
    #[error("Provider error: {0}")]
    Provider(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Caller-supplied data violates a precondition
    #[error("Input error: {0}")]
    Input(String),
}
