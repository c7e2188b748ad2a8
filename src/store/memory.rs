use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::{DocumentStore, StoreError};
use crate::metrics;
use crate::models::HealthDocument;

/// In-process store keyed by random UUIDs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, HealthDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, document: &HealthDocument) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.documents.write().insert(id.clone(), document.clone());
        metrics::record_store_operation("create", true);
        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<HealthDocument>, StoreError> {
        metrics::record_store_operation("find_by_id", true);
        Ok(self.documents.read().get(id).cloned())
    }
}
