use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::MetricQuery;

pub const PROMETHEUS: &str = "prometheus";

/// Optional range parameters, appended in this order when present.
const RANGE_PARAMS: [&str; 3] = ["start", "end", "step"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("metric query has no parameters")]
    EmptyParameters,

    #[error("unsupported data source type '{0}'")]
    UnsupportedDataSource(String),
}

/// Maps one metric query to the URL its data source understands.
pub fn build_url(query: &MetricQuery) -> Result<String, BuildError> {
    if query.parameters.is_empty() {
        return Err(BuildError::EmptyParameters);
    }

    match query.data_source_type.as_str() {
        PROMETHEUS => Ok(prometheus_url(&query.parameters)),
        other => Err(BuildError::UnsupportedDataSource(other.to_string())),
    }
}

/// Builds a Prometheus `query_range` URL.
///
/// `endpoint` is the API base, e.g. `http://prometheus:9090/api/v1/`. The
/// result is not validated; missing keys yield empty segments.
pub fn prometheus_url(parameters: &BTreeMap<String, String>) -> String {
    let endpoint = parameters.get("endpoint").map(String::as_str).unwrap_or_default();
    let query = parameters.get("query").map(String::as_str).unwrap_or_default();

    let mut url = String::with_capacity(endpoint.len() + query.len() + 64);
    url.push_str(endpoint);
    if !endpoint.is_empty() && !endpoint.ends_with('/') {
        url.push('/');
    }
    url.push_str("query_range?query=");
    url.push_str(&urlencoding::encode(query));

    for key in RANGE_PARAMS {
        if let Some(value) = parameters.get(key) {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
    }
    url
}
