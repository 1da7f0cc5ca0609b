use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use uuid::Uuid;

use super::{AuthorizationStatus, HealthDataType, HealthStore, StatisticsOption, StatisticsQuery};
use crate::calendar::DateWindow;
use crate::db::{Database, StepSample};
use crate::error::HealthStoreError;

const CONSOLE_SOURCE: &str = "console";

/// Health store backed by a local SQLite file of step samples.
#[derive(Clone)]
pub struct SqliteHealthStore {
    db: Database,
    default_status: AuthorizationStatus,
}

impl SqliteHealthStore {
    pub fn open(db_path: PathBuf) -> Result<Self> {
        Ok(Self::with_database(Database::new(db_path)?))
    }

    pub fn with_database(db: Database) -> Self {
        Self {
            db,
            default_status: AuthorizationStatus::Granted,
        }
    }

    /// Status recorded the first time read access is requested.
    pub fn with_default_status(mut self, status: AuthorizationStatus) -> Self {
        self.default_status = status;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn record_steps(&self, count: f64, recorded_at: DateTime<Utc>) -> Result<StepSample> {
        let sample = StepSample {
            id: Uuid::new_v4().to_string(),
            recorded_at,
            count,
            source: CONSOLE_SOURCE.to_string(),
        };
        self.db.insert_sample(&sample).await?;
        debug!("Recorded {} steps at {}", sample.count, sample.recorded_at);
        Ok(sample)
    }

    pub async fn samples_in(&self, window: &DateWindow) -> Result<Vec<StepSample>> {
        self.db.samples_between(window.start, window.end).await
    }

    pub async fn set_authorization(&self, status: AuthorizationStatus) -> Result<()> {
        self.db
            .set_authorization_status(HealthDataType::StepCount, status)
            .await?;
        info!("Step count read access set to {}", status.as_str());
        Ok(())
    }
}

#[async_trait]
impl HealthStore for SqliteHealthStore {
    async fn request_authorization(
        &self,
        read: &[HealthDataType],
    ) -> Result<AuthorizationStatus, HealthStoreError> {
        let mut combined = AuthorizationStatus::Granted;

        for data_type in read {
            let status = match self.db.authorization_status(*data_type).await? {
                Some(status) => status,
                None => {
                    self.db
                        .set_authorization_status(*data_type, self.default_status)
                        .await?;
                    self.default_status
                }
            };
            if status == AuthorizationStatus::Denied {
                combined = AuthorizationStatus::Denied;
            }
        }

        Ok(combined)
    }

    async fn execute_statistics(
        &self,
        query: &StatisticsQuery,
    ) -> Result<Option<f64>, HealthStoreError> {
        let StatisticsOption::CumulativeSum = query.option;

        match self.db.authorization_status(query.data_type).await? {
            Some(AuthorizationStatus::Granted) => {}
            _ => return Err(HealthStoreError::AuthorizationDenied(query.data_type)),
        }

        let total = self.db.sum_steps(query.window.start, query.window.end).await?;
        Ok(total)
    }
}
