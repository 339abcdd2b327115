// crates/db/src/queries/jobs.rs
//! Job record persistence: insert-or-replace, point lookup, recency-bounded list.

use benchview_core::{Job, JobStatus};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::{Database, DbResult};

/// Upper bound on [`list_recent_jobs`] results. The list view is bounded
/// and non-paginated; retention of older records is an external concern.
pub const RECENT_JOBS_CAP: u32 = 200;

/// Insert a new record or fully replace an existing record with the same id.
///
/// A single UPSERT statement, so a concurrent reader sees either the old or
/// the new record, never a partially written one. Timestamps are persisted
/// at millisecond precision.
pub async fn put_job(db: &Database, job: &Job) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO jobs (id, job_type, action, status, created_at, started_at, finished_at, progress, message, error)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             job_type    = excluded.job_type,
             action      = excluded.action,
             status      = excluded.status,
             created_at  = excluded.created_at,
             started_at  = excluded.started_at,
             finished_at = excluded.finished_at,
             progress    = excluded.progress,
             message     = excluded.message,
             error       = excluded.error",
    )
    .bind(&job.id)
    .bind(&job.job_type)
    .bind(&job.action)
    .bind(job.status.as_str())
    .bind(job.created_at.timestamp_millis())
    .bind(job.started_at.map(|t| t.timestamp_millis()))
    .bind(job.finished_at.map(|t| t.timestamp_millis()))
    .bind(job.progress.map(i64::from))
    .bind(&job.message)
    .bind(&job.error)
    .execute(db.pool())
    .await?;
    Ok(())
}

/// Point lookup by id.
pub async fn get_job(db: &Database, id: &str) -> DbResult<Option<Job>> {
    let row = sqlx::query(
        "SELECT id, job_type, action, status, created_at, started_at, finished_at, progress, message, error
         FROM jobs
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db.pool())
    .await?;

    match row {
        Some(row) => Ok(Some(job_from_row(&row)?)),
        None => Ok(None),
    }
}

/// The most recent `limit` jobs, ordered by `created_at` descending.
pub async fn list_recent_jobs(db: &Database, limit: u32) -> DbResult<Vec<Job>> {
    let rows = sqlx::query(
        "SELECT id, job_type, action, status, created_at, started_at, finished_at, progress, message, error
         FROM jobs
         ORDER BY created_at DESC, id DESC
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(db.pool())
    .await?;

    rows.iter()
        .map(job_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

fn job_from_row(row: &SqliteRow) -> Result<Job, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status: JobStatus = status.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".into(),
        source: Box::new(e),
    })?;

    Ok(Job {
        id: row.try_get("id")?,
        job_type: row.try_get("job_type")?,
        action: row.try_get("action")?,
        status,
        created_at: required_millis(row, "created_at")?,
        started_at: optional_millis(row, "started_at")?,
        finished_at: optional_millis(row, "finished_at")?,
        progress: row.try_get::<Option<i64>, _>("progress")?.map(|p| p as u8),
        message: row.try_get("message")?,
        error: row.try_get("error")?,
    })
}

fn decode_millis(ms: i64, column: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.into(),
        source: format!("timestamp out of range: {ms}").into(),
    })
}

fn required_millis(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    decode_millis(row.try_get(column)?, column)
}

fn optional_millis(row: &SqliteRow, column: &str) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
    row.try_get::<Option<i64>, _>(column)?
        .map(|ms| decode_millis(ms, column))
        .transpose()
}
