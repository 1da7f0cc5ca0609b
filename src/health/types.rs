use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::DateWindow;
use crate::error::{HealthStoreError, WindowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthDataType {
    StepCount,
}

impl HealthDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthDataType::StepCount => "stepCount",
        }
    }
}

impl fmt::Display for HealthDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatisticsOption {
    CumulativeSum,
}

/// Aggregate request over the samples of one type inside a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    pub id: Uuid,
    pub data_type: HealthDataType,
    pub window: DateWindow,
    pub option: StatisticsOption,
}

impl StatisticsQuery {
    pub fn step_count_sum(window: DateWindow) -> Self {
        Self {
            id: Uuid::new_v4(),
            data_type: HealthDataType::StepCount,
            window,
            option: StatisticsOption::CumulativeSum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationStatus {
    Granted,
    Denied,
}

impl AuthorizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizationStatus::Granted => "granted",
            AuthorizationStatus::Denied => "denied",
        }
    }
}

/// What the store answered to the read-permission request made at activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "reason")]
pub enum AuthorizationOutcome {
    Pending,
    Granted,
    Denied,
    Failed(String),
}

impl From<Result<AuthorizationStatus, HealthStoreError>> for AuthorizationOutcome {
    fn from(result: Result<AuthorizationStatus, HealthStoreError>) -> Self {
        match result {
            Ok(AuthorizationStatus::Granted) => AuthorizationOutcome::Granted,
            Ok(AuthorizationStatus::Denied) => AuthorizationOutcome::Denied,
            Err(err) => AuthorizationOutcome::Failed(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    AuthorizationDenied,
    Store,
    Window,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl From<HealthStoreError> for QueryFailure {
    fn from(err: HealthStoreError) -> Self {
        let kind = match err {
            HealthStoreError::AuthorizationDenied(_) => FailureKind::AuthorizationDenied,
            _ => FailureKind::Store,
        };
        Self {
            kind,
            reason: err.to_string(),
        }
    }
}

impl From<WindowError> for QueryFailure {
    fn from(err: WindowError) -> Self {
        Self {
            kind: FailureKind::Window,
            reason: err.to_string(),
        }
    }
}

/// Outcome of one step-count query, consumed by the renderer and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum StepCountResult {
    Success { count: u64 },
    Unavailable,
    Error(QueryFailure),
}

impl StepCountResult {
    /// Fractional sums are truncated toward zero.
    pub fn from_sum(outcome: Result<Option<f64>, HealthStoreError>) -> Self {
        match outcome {
            Ok(Some(value)) if value.is_finite() && value >= 0.0 => StepCountResult::Success {
                count: value.trunc() as u64,
            },
            Ok(Some(value)) => StepCountResult::Error(HealthStoreError::InvalidSum(value).into()),
            Ok(None) => StepCountResult::Unavailable,
            Err(err) => StepCountResult::Error(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_sum_truncates_toward_zero() {
        assert_eq!(
            StepCountResult::from_sum(Ok(Some(1234.7))),
            StepCountResult::Success { count: 1234 }
        );
        assert_eq!(
            StepCountResult::from_sum(Ok(Some(0.99))),
            StepCountResult::Success { count: 0 }
        );
    }

    #[test]
    fn missing_sum_is_unavailable() {
        assert_eq!(StepCountResult::from_sum(Ok(None)), StepCountResult::Unavailable);
    }

    #[test]
    fn store_errors_keep_their_kind() {
        let denied = StepCountResult::from_sum(Err(HealthStoreError::AuthorizationDenied(
            HealthDataType::StepCount,
        )));
        let backend =
            StepCountResult::from_sum(Err(HealthStoreError::Backend("disk on fire".into())));

        match (denied, backend) {
            (StepCountResult::Error(a), StepCountResult::Error(b)) => {
                assert_eq!(a.kind, FailureKind::AuthorizationDenied);
                assert_eq!(b.kind, FailureKind::Store);
                assert!(b.reason.contains("disk on fire"));
            }
            other => panic!("unexpected results: {other:?}"),
        }
    }

    #[test]
    fn negative_or_nan_sums_are_errors() {
        assert!(matches!(
            StepCountResult::from_sum(Ok(Some(-3.0))),
            StepCountResult::Error(QueryFailure { kind: FailureKind::Store, .. })
        ));
        assert!(matches!(
            StepCountResult::from_sum(Ok(Some(f64::NAN))),
            StepCountResult::Error(_)
        ));
    }

    #[test]
    fn authorization_outcome_from_store_answer() {
        assert_eq!(
            AuthorizationOutcome::from(Ok(AuthorizationStatus::Denied)),
            AuthorizationOutcome::Denied
        );
        assert!(matches!(
            AuthorizationOutcome::from(Err(HealthStoreError::Backend("offline".into()))),
            AuthorizationOutcome::Failed(reason) if reason.contains("offline")
        ));
    }
}
