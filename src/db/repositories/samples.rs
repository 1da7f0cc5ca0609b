use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    helpers::{format_datetime, non_negative, parse_datetime},
    models::StepSample,
    Database,
};

fn row_to_sample(row: &Row) -> Result<StepSample> {
    let recorded_at: String = row.get("recorded_at")?;

    Ok(StepSample {
        id: row.get("id")?,
        recorded_at: parse_datetime(&recorded_at, "recorded_at")?,
        count: row.get("count")?,
        source: row.get("source")?,
    })
}

impl Database {
    pub async fn insert_sample(&self, sample: &StepSample) -> Result<()> {
        let record = sample.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO step_samples (id, recorded_at, count, source)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.id,
                    format_datetime(record.recorded_at)?,
                    non_negative(record.count, "count")?,
                    record.source,
                ],
            )
            .with_context(|| "failed to insert step sample")?;
            Ok(())
        })
        .await
    }

    /// Sum of sample counts recorded in `[start, end)`; `None` when the range holds no samples.
    pub async fn sum_steps(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<f64>> {
        self.execute(move |conn| {
            let total: Option<f64> = conn
                .query_row(
                    "SELECT SUM(count) FROM step_samples
                     WHERE recorded_at >= ?1 AND recorded_at < ?2",
                    params![format_datetime(start)?, format_datetime(end)?],
                    |row| row.get(0),
                )
                .with_context(|| "failed to sum step samples")?;
            Ok(total)
        })
        .await
    }

    pub async fn samples_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StepSample>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, recorded_at, count, source FROM step_samples
                 WHERE recorded_at >= ?1 AND recorded_at < ?2
                 ORDER BY recorded_at ASC",
            )?;

            let mut rows = stmt.query(params![format_datetime(start)?, format_datetime(end)?])?;
            let mut samples = Vec::new();
            while let Some(row) = rows.next()? {
                samples.push(row_to_sample(row)?);
            }
            Ok(samples)
        })
        .await
    }
}
