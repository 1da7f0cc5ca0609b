use chrono::NaiveDate;
use thiserror::Error;

use crate::health::HealthDataType;

/// Failure to turn a reference instant into a calendar-day window.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("day after {0} is outside the supported calendar range")]
    OutOfRange(NaiveDate),
    #[error("no valid local instant near the start of {0}")]
    UnresolvableDayStart(NaiveDate),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum HealthStoreError {
    #[error("read access to {0} was denied")]
    AuthorizationDenied(HealthDataType),
    #[error("store returned an unusable sum: {0}")]
    InvalidSum(f64),
    #[error("health store failure: {0}")]
    Backend(String),
}

impl From<anyhow::Error> for HealthStoreError {
    fn from(err: anyhow::Error) -> Self {
        HealthStoreError::Backend(format!("{err:#}"))
    }
}
