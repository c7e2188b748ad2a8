use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Status marker stored on every newly created document.
pub const DOCUMENT_STATUS_CREATED: &str = "200";

/// A single metric query: which data source to ask and with what parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricQuery {
    #[serde(default, alias = "type")]
    pub data_source_type: String,
    #[serde(default, alias = "params")]
    pub parameters: BTreeMap<String, String>,
}

impl MetricQuery {
    pub fn new(data_source_type: impl Into<String>) -> Self {
        Self {
            data_source_type: data_source_type.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Queries keyed by their name. Sorted by name so serialization is stable.
pub type NamedQueryGroup = BTreeMap<String, MetricQuery>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsInfo {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub current: NamedQueryGroup,
    #[serde(default)]
    pub baseline: Option<NamedQueryGroup>,
    #[serde(default)]
    pub historical: Option<NamedQueryGroup>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<NamedQueryGroup, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NamedQueryGroup>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /v1/healthcheck/create`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationHealthAnalyzeRequest {
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub metrics: MetricsInfo,
    #[serde(default)]
    pub strategy: String,
}

/// The document persisted for every accepted request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDocument {
    pub app_name: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub current_config: String,
    #[serde(default)]
    pub baseline_config: String,
    #[serde(default)]
    pub historical_config: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub strategy: String,
}

impl HealthDocument {
    pub fn from_request(request: &ApplicationHealthAnalyzeRequest, configs: [String; 3]) -> Self {
        let [current_config, baseline_config, historical_config] = configs;
        Self {
            app_name: request.app_name.clone(),
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            current_config,
            baseline_config,
            historical_config,
            status: DOCUMENT_STATUS_CREATED.to_string(),
            strategy: request.strategy.clone(),
        }
    }
}

/// Envelope describing a job: creation result, lookup miss or store failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub job_id: String,
    pub status: String,
    pub status_code: u16,
    pub reason: String,
}

impl JobResponse {
    pub fn created(id: String) -> Self {
        Self {
            job_id: id,
            status: "new".to_string(),
            status_code: 200,
            reason: String::new(),
        }
    }

    pub fn create_failed(reason: String) -> Self {
        Self {
            job_id: String::new(),
            status: "new".to_string(),
            status_code: 500,
            reason,
        }
    }

    pub fn not_found(id: &str) -> Self {
        Self {
            job_id: id.to_string(),
            status: "unknown".to_string(),
            status_code: 404,
            reason: format!("{} not found.", id),
        }
    }

    pub fn lookup_failed(id: &str, reason: String) -> Self {
        Self {
            job_id: id.to_string(),
            status: "unknown".to_string(),
            status_code: 500,
            reason,
        }
    }
}

/// A stored document as returned by `GET /v1/healthcheck/id/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub job_id: String,
    #[serde(flatten)]
    pub document: HealthDocument,
}
