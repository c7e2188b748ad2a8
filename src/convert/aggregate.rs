use std::fmt;
use tracing::{error, warn};

use super::group::serialize_group;
use crate::models::MetricsInfo;

pub const CURRENT_EMPTY_REASON: &str = "MetricInfo current is empty";

const CURRENT_PREFIX: &str = "current query encount error ";
const BASELINE_PREFIX: &str = " baseline query encount error ";
const HISTORICAL_PREFIX: &str = " historical query encount error ";

/// Overall outcome of aggregating the three query groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    FullSuccess,
    /// Current failed to build but a present historical group built.
    RescuedByHistorical,
    Failed,
}

impl Verdict {
    /// `historical_ok` is `None` when no historical group was supplied.
    /// Baseline never takes part.
    pub fn decide(current_ok: bool, historical_ok: Option<bool>) -> Self {
        match (current_ok, historical_ok) {
            (true, _) => Verdict::FullSuccess,
            (false, Some(true)) => Verdict::RescuedByHistorical,
            (false, _) => Verdict::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::FullSuccess => "full_success",
            Verdict::RescuedByHistorical => "rescued_by_historical",
            Verdict::Failed => "failed",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationOutcome {
    pub verdict: Verdict,
    /// Accumulated failure text; empty when every supplied group built.
    pub reason: String,
    /// Serialized `[current, baseline, historical]`, empty where not produced.
    pub configs: [String; 3],
}

impl AggregationOutcome {
    pub fn succeeded(&self) -> bool {
        self.verdict != Verdict::Failed
    }
}

pub fn aggregate(info: &MetricsInfo) -> AggregationOutcome {
    let mut configs: [String; 3] = Default::default();

    if info.current.is_empty() {
        return AggregationOutcome {
            verdict: Verdict::Failed,
            reason: CURRENT_EMPTY_REASON.to_string(),
            configs,
        };
    }

    let mut reason = String::new();

    let current_ok = match serialize_group(&info.current) {
        Ok(serialized) => {
            configs[0] = serialized;
            true
        }
        Err(e) => {
            error!("current query group failed to build: {}", e);
            reason.push_str(CURRENT_PREFIX);
            reason.push_str(&e.to_string());
            reason.push('\n');
            false
        }
    };

    if let Some(baseline) = &info.baseline {
        match serialize_group(baseline) {
            Ok(serialized) => configs[1] = serialized,
            Err(e) => {
                warn!("baseline query group failed to build: {}", e);
                reason.push_str(BASELINE_PREFIX);
                reason.push_str(&e.to_string());
            }
        }
    }

    let historical_ok = info.historical.as_ref().map(|historical| {
        match serialize_group(historical) {
            Ok(serialized) => {
                configs[2] = serialized;
                true
            }
            Err(e) => {
                warn!("historical query group failed to build: {}", e);
                reason.push_str(HISTORICAL_PREFIX);
                reason.push_str(&e.to_string());
                false
            }
        }
    });

    AggregationOutcome {
        verdict: Verdict::decide(current_ok, historical_ok),
        reason,
        configs,
    }
}
