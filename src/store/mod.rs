//! Persistence for health-check documents.
//!
//! Handlers only see [`DocumentStore`]; the concrete backend is chosen at
//! startup and passed in through the router state.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::HealthDocument;

pub mod elastic;
pub mod memory;

pub use elastic::ElasticStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("store returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("failed to decode store response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Unreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists a document and returns the identifier assigned to it.
    async fn create(&self, document: &HealthDocument) -> Result<String, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<HealthDocument>, StoreError>;
}
