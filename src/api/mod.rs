//! External search collaborator
//!
//! The dashboard search never talks to a backend directly; it goes through
//! [`SearchClient`]. The HTTP implementation speaks the dashboard's existing
//! search endpoint, the wire models live next to it.

pub mod client;
pub mod models;

use crate::data::ResultBucket;
use async_trait::async_trait;
use thiserror::Error;

pub use client::HttpSearchClient;

/// Failures of the search collaborator. The widget collapses all of them to
/// an empty result; the distinction only shows up in the logs.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("search backend unavailable: {0}")]
    Unavailable(String),
}

/// Free-text search over every category, capped per category
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str, limit_per_category: usize)
        -> Result<Vec<ResultBucket>, SearchError>;

    /// Short name for logs and the debug pane
    fn name(&self) -> &str;
}
