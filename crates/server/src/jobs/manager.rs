// crates/server/src/jobs/manager.rs
//! The job lifecycle manager: the sole writer of job state.

use std::sync::Arc;

use benchview_core::{Job, JobEvent, JobPatch, JobStatus};
use benchview_db::{get_job, list_recent_jobs, put_job, Database, DbResult, RECENT_JOBS_CAP};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::hub::JobHub;

/// Owns job creation and state transitions. On every mutation the manager
/// writes the full record through the store, then publishes a snapshot to
/// the hub.
///
/// `create` and `patch` are the only two mutation entry points; nothing else
/// constructs or rewrites a job record. The manager performs no field-level
/// validation and no retries: producers own patch semantics (including not
/// patching after a terminal state) and retry policy. There is no deadline
/// enforcement either: a job whose producer never reports back stays
/// `running` until someone patches it.
pub struct JobManager {
    db: Database,
    hub: Arc<JobHub>,
    /// Patches are read-merge-replace; one writer at a time keeps concurrent
    /// merges from clobbering each other. Last write wins per completed call.
    write_lock: Mutex<()>,
}

impl JobManager {
    pub fn new(db: Database, hub: Arc<JobHub>) -> Self {
        Self {
            db,
            hub,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a new job in the `queued` state, persist it, and broadcast it.
    ///
    /// If the store write fails the event is still published, flagged
    /// `durable: false`, so observers are not starved of status; the error
    /// is then propagated to the producer, which owns any retry (a retried
    /// producer task calls `create` again and gets a fresh id).
    pub async fn create(
        &self,
        job_type: impl Into<String>,
        action: impl Into<String>,
    ) -> DbResult<Job> {
        let job = Job {
            id: Uuid::new_v4().to_string(),
            job_type: job_type.into(),
            action: action.into(),
            status: JobStatus::Queued,
            created_at: now_millis(),
            started_at: None,
            finished_at: None,
            progress: None,
            message: None,
            error: None,
        };

        match put_job(&self.db, &job).await {
            Ok(()) => {
                tracing::info!(job_id = %job.id, job_type = %job.job_type, action = %job.action, "job created");
                self.hub.publish(&JobEvent::Job {
                    job: job.clone(),
                    durable: true,
                });
                Ok(job)
            }
            Err(e) => {
                tracing::error!(job_id = %job.id, error = %e, "failed to persist new job");
                self.hub.publish(&JobEvent::Job {
                    job: job.clone(),
                    durable: false,
                });
                Err(e)
            }
        }
    }

    /// Merge `patch` into the current record, persist the merged record as a
    /// full replacement, and broadcast the new snapshot.
    ///
    /// Patching an unknown id is a silent no-op (`Ok(None)`): producers may
    /// race job creation against store unavailability, and a stray late
    /// patch must not invent a record. Store state is untouched and nothing
    /// is broadcast in that case.
    pub async fn patch(&self, id: &str, patch: JobPatch) -> DbResult<Option<Job>> {
        let _guard = self.write_lock.lock().await;

        let Some(mut job) = get_job(&self.db, id).await? else {
            tracing::debug!(job_id = %id, "patch for unknown job ignored");
            return Ok(None);
        };

        job.apply(canonicalized(patch));

        match put_job(&self.db, &job).await {
            Ok(()) => {
                tracing::debug!(job_id = %job.id, status = %job.status, progress = ?job.progress, "job patched");
                self.hub.publish(&JobEvent::Job {
                    job: job.clone(),
                    durable: true,
                });
                Ok(Some(job))
            }
            Err(e) => {
                tracing::error!(job_id = %job.id, error = %e, "failed to persist job patch");
                self.hub.publish(&JobEvent::Job {
                    job: job.clone(),
                    durable: false,
                });
                Err(e)
            }
        }
    }

    /// Point lookup straight from the store.
    pub async fn get(&self, id: &str) -> DbResult<Option<Job>> {
        get_job(&self.db, id).await
    }

    /// The most recent jobs, newest first, bounded by the store cap.
    pub async fn list(&self) -> DbResult<Vec<Job>> {
        list_recent_jobs(&self.db, RECENT_JOBS_CAP).await
    }
}

/// The store persists millisecond precision; truncate up front so the
/// broadcast snapshot is identical to what a re-read returns.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

fn canonicalized(mut patch: JobPatch) -> JobPatch {
    patch.started_at = patch
        .started_at
        .map(|t| DateTime::from_timestamp_millis(t.timestamp_millis()).unwrap_or(t));
    patch.finished_at = patch
        .finished_at
        .map(|t| DateTime::from_timestamp_millis(t.timestamp_millis()).unwrap_or(t));
    patch
}
