//! Translation of metric queries into the serialized configs stored with
//! each health-check document.
//!
//! Three layers, leaves first: [`url`] turns one query into a data-source
//! URL, [`group`] joins a named set of those URLs into a single string, and
//! [`aggregate`] applies the current/baseline/historical fallback policy.

pub mod aggregate;
pub mod group;
pub mod url;

pub use aggregate::{aggregate, AggregationOutcome, Verdict};
pub use group::{parse_group, serialize_group, GroupError, ParseError, GROUP_SEPARATOR, KV_SEPARATOR};
pub use url::{build_url, prometheus_url, BuildError};
