use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{DocumentStore, StoreError};
use crate::metrics;
use crate::models::HealthDocument;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<HealthDocument>,
}

/// Elasticsearch-backed document store speaking the plain REST API.
#[derive(Debug, Clone)]
pub struct ElasticStore {
    client: Client,
    base_url: String,
    index: String,
}

impl ElasticStore {
    pub fn new(base_url: &str, index: &str) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        })
    }

    /// Blocks until the cluster answers, retrying every `retry_delay`.
    pub async fn connect(
        base_url: &str,
        index: &str,
        retry_delay: Duration,
    ) -> Result<Self, StoreError> {
        let store = Self::new(base_url, index)?;
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            match store.ping().await {
                Ok(()) => {
                    info!("Connected to elasticsearch at {} (attempt {})", store.base_url, attempt);
                    return Ok(store);
                }
                Err(e) => {
                    warn!(
                        "failed to reach elasticsearch endpoint {}: {}; retrying in {:?}",
                        store.base_url, e, retry_delay
                    );
                    sleep(retry_delay).await;
                }
            }
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        let response = self.client.get(&self.base_url).send().await?;
        check_status(response).await.map(|_| ())
    }

    fn documents_url(&self) -> String {
        format!("{}/{}/_doc", self.base_url, self.index)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.documents_url(), urlencoding::encode(id))
    }
}

async fn check_status(response: reqwest::Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(StoreError::Backend {
            status: status.as_u16(),
            body,
        })
    }
}

fn parse_index_response(body: &str) -> Result<String, StoreError> {
    let parsed: IndexResponse = serde_json::from_str(body)?;
    Ok(parsed.id)
}

fn parse_get_response(status: StatusCode, body: &str) -> Result<Option<HealthDocument>, StoreError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(StoreError::Backend {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let parsed: GetResponse = serde_json::from_str(body)?;
    if !parsed.found {
        return Ok(None);
    }
    parsed
        .source
        .map(Some)
        .ok_or_else(|| StoreError::Decode("document found without _source".to_string()))
}

#[async_trait]
impl DocumentStore for ElasticStore {
    async fn create(&self, document: &HealthDocument) -> Result<String, StoreError> {
        let result: Result<String, StoreError> = async {
            let response = self
                .client
                .post(self.documents_url())
                .json(document)
                .send()
                .await?;
            let body = check_status(response).await?;
            parse_index_response(&body)
        }
        .await;

        metrics::record_store_operation("create", result.is_ok());
        if let Ok(id) = &result {
            debug!("Indexed document {} into {}", id, self.index);
        }
        result
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<HealthDocument>, StoreError> {
        let result: Result<Option<HealthDocument>, StoreError> = async {
            let response = self.client.get(self.document_url(id)).send().await?;
            let status = response.status();
            let body = response.text().await?;
            parse_get_response(status, &body)
        }
        .await;

        metrics::record_store_operation("find_by_id", result.is_ok());
        result
    }
}
