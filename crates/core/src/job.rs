// crates/core/src/job.rs
//! Job records and lifecycle types.
//!
//! A [`Job`] is the unit of trackable work: created once, updated by
//! full-record replacement through [`JobPatch`] merges, never deleted.
//! [`JobEvent`] is the envelope pushed to live observers on every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a [`Job`].
///
/// `queued → running → completed | failed`. The two terminal states accept
/// no further transitions; producers must not emit patches after reporting
/// one (documented contract, not mechanically blocked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string that names no lifecycle state.
#[derive(Debug, Error)]
#[error("unknown job status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A tracked unit of asynchronous work.
///
/// `id`, `type`, `action`, and `createdAt` are immutable after creation.
/// Everything else arrives from the producer via [`JobPatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    /// Producer-defined category tag, e.g. `"diagnostic"`.
    #[serde(rename = "type")]
    pub job_type: String,
    /// Human-readable description of this job instance.
    pub action: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// 0–100; producers are expected to keep this non-decreasing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure description; only meaningful when `status` is `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Merge a patch into this record. Supplied fields replace their
    /// current values; absent fields are left untouched.
    pub fn apply(&mut self, patch: JobPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(started_at) = patch.started_at {
            self.started_at = Some(started_at);
        }
        if let Some(finished_at) = patch.finished_at {
            self.finished_at = Some(finished_at);
        }
        if let Some(progress) = patch.progress {
            self.progress = Some(progress);
        }
        if let Some(message) = patch.message {
            self.message = Some(message);
        }
        if let Some(error) = patch.error {
            self.error = Some(error);
        }
    }
}

/// A partial update to a [`Job`].
///
/// Every field is independently optional; `None` means "leave unchanged".
/// The lifecycle manager applies the merge and persists the full record as
/// one atomic replacement, so there are no field-level write races.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub progress: Option<u8>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl JobPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn started_at(mut self, at: DateTime<Utc>) -> Self {
        self.started_at = Some(at);
        self
    }

    pub fn finished_at(mut self, at: DateTime<Utc>) -> Self {
        self.finished_at = Some(at);
        self
    }

    pub fn progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Envelope pushed through the broadcast hub on every job mutation.
///
/// `durable` is false when the store write failed and the snapshot exists
/// only in memory; observers should treat such a record as provisional
/// until a later event (or a `list()` re-fetch) confirms it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum JobEvent {
    Job { job: Job, durable: bool },
}

impl JobEvent {
    /// The job snapshot carried by this event.
    pub fn job(&self) -> &Job {
        match self {
            JobEvent::Job { job, .. } => job,
        }
    }

    pub fn is_durable(&self) -> bool {
        match self {
            JobEvent::Job { durable, .. } => *durable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> Job {
        Job {
            id: "j-1".into(),
            job_type: "diagnostic".into(),
            action: "android_logcat:ABC123".into(),
            status: JobStatus::Queued,
            created_at: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
            started_at: None,
            finished_at: None,
            progress: None,
            message: None,
            error: None,
        }
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            JobStatus::Queued,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("paused".parse::<JobStatus>().is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn job_serializes_camel_case_and_skips_unset_fields() {
        let json = serde_json::to_string(&sample_job()).unwrap();
        assert!(json.contains("\"type\":\"diagnostic\""));
        assert!(json.contains("\"status\":\"queued\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("startedAt"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn apply_merges_supplied_fields_only() {
        let mut job = sample_job();
        let started = DateTime::from_timestamp_millis(1_700_000_001_000).unwrap();
        job.apply(
            JobPatch::new()
                .status(JobStatus::Running)
                .started_at(started)
                .progress(10),
        );

        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.started_at, Some(started));
        assert_eq!(job.progress, Some(10));
        // Untouched fields survive the merge.
        assert_eq!(job.action, "android_logcat:ABC123");
        assert_eq!(job.message, None);

        job.apply(JobPatch::new().message("halfway"));
        assert_eq!(job.message.as_deref(), Some("halfway"));
        assert_eq!(job.progress, Some(10));
    }

    #[test]
    fn empty_patch_is_identity() {
        let mut job = sample_job();
        let before = job.clone();
        job.apply(JobPatch::new());
        assert_eq!(job, before);
    }

    #[test]
    fn event_envelope_carries_kind_tag() {
        let event = JobEvent::Job {
            job: sample_job(),
            durable: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"job\""));
        assert!(json.contains("\"durable\":true"));

        let parsed: JobEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.job().id, "j-1");
        assert!(parsed.is_durable());
    }
}
