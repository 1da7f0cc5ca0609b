use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::db::{helpers::format_datetime, Database};
use crate::health::{AuthorizationStatus, HealthDataType};

fn parse_status(value: &str) -> Result<AuthorizationStatus> {
    match value {
        "granted" => Ok(AuthorizationStatus::Granted),
        "denied" => Ok(AuthorizationStatus::Denied),
        other => Err(anyhow!("unknown authorization status {other}")),
    }
}

impl Database {
    pub async fn authorization_status(
        &self,
        data_type: HealthDataType,
    ) -> Result<Option<AuthorizationStatus>> {
        self.execute(move |conn| {
            let status: Option<String> = conn
                .query_row(
                    "SELECT status FROM authorizations WHERE data_type = ?1",
                    params![data_type.as_str()],
                    |row| row.get(0),
                )
                .optional()
                .with_context(|| "failed to read authorization status")?;

            status.as_deref().map(parse_status).transpose()
        })
        .await
    }

    pub async fn set_authorization_status(
        &self,
        data_type: HealthDataType,
        status: AuthorizationStatus,
    ) -> Result<()> {
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO authorizations (data_type, status, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(data_type) DO UPDATE SET
                     status = excluded.status,
                     updated_at = excluded.updated_at",
                params![
                    data_type.as_str(),
                    status.as_str(),
                    format_datetime(Utc::now())?,
                ],
            )
            .with_context(|| "failed to store authorization status")?;
            Ok(())
        })
        .await
    }
}
