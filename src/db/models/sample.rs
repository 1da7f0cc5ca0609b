use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped step-count record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepSample {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub count: f64,
    pub source: String,
}
