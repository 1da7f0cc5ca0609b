pub mod sqlite;
pub mod store;
pub mod types;

pub use sqlite::SqliteHealthStore;
pub use store::HealthStore;
pub use types::{
    AuthorizationOutcome, AuthorizationStatus, FailureKind, HealthDataType, QueryFailure,
    StatisticsOption, StatisticsQuery, StepCountResult,
};
