// crates/server/src/producers/logcat.rs
//! Device log collection: dump the Android log buffer over adb and save it
//! under the data directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use benchview_core::{paths, Job, JobPatch, JobStatus};
use benchview_db::DbResult;
use chrono::Utc;

use crate::jobs::JobManager;

/// Create the tracking job and spawn the collection task.
///
/// Returns as soon as the `queued` record is durable; the task itself
/// reports `running`, progress, and a terminal state through `patch`. A
/// failed create propagates `StorageUnavailable` and nothing is spawned;
/// the caller retries the whole operation, which gets a fresh job id.
pub async fn start(manager: Arc<JobManager>, serial: String) -> DbResult<Job> {
    let job = manager
        .create("diagnostic", format!("android_logcat:{serial}"))
        .await?;

    let id = job.id.clone();
    tokio::spawn(async move {
        if let Err(e) = collect(&manager, &id, &serial).await {
            tracing::warn!(job_id = %id, device = %serial, error = %e, "log collection failed");
            let failure = JobPatch::new()
                .status(JobStatus::Failed)
                .finished_at(Utc::now())
                .error(e.to_string());
            if let Err(patch_err) = manager.patch(&id, failure).await {
                tracing::error!(job_id = %id, error = %patch_err, "failed to record job failure");
            }
        }
    });

    Ok(job)
}

async fn collect(manager: &JobManager, id: &str, serial: &str) -> anyhow::Result<()> {
    manager
        .patch(
            id,
            JobPatch::new()
                .status(JobStatus::Running)
                .started_at(Utc::now())
                .progress(10)
                .message("Capturing device log"),
        )
        .await?;

    let output = tokio::process::Command::new("adb")
        .args(["-s", serial, "logcat", "-d"])
        .output()
        .await
        .context("failed to run adb")?;
    if !output.status.success() {
        bail!(
            "adb exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    manager
        .patch(id, JobPatch::new().progress(60).message("Writing report"))
        .await?;

    let path = report_path(serial, id)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, &output.stdout).await?;

    manager
        .patch(
            id,
            JobPatch::new()
                .status(JobStatus::Completed)
                .finished_at(Utc::now())
                .progress(100)
                .message(format!("Report saved to {}", path.display())),
        )
        .await?;

    Ok(())
}

fn report_path(serial: &str, id: &str) -> anyhow::Result<PathBuf> {
    let dir = paths::logs_dir().context("could not resolve data directory")?;
    Ok(dir.join(format!("{serial}-{id}.log")))
}
