use async_trait::async_trait;

use super::{AuthorizationStatus, HealthDataType, StatisticsQuery};
use crate::error::HealthStoreError;

/// Access to a health-data service holding timestamped samples.
///
/// Implementations may complete on any worker; callers are responsible for
/// moving results back to whichever task owns the display.
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Ask for read access to `read`. Nothing is ever written.
    async fn request_authorization(
        &self,
        read: &[HealthDataType],
    ) -> Result<AuthorizationStatus, HealthStoreError>;

    /// Run an aggregate query. `Ok(None)` means the query completed without a sum.
    async fn execute_statistics(
        &self,
        query: &StatisticsQuery,
    ) -> Result<Option<f64>, HealthStoreError>;
}
