//! Background job processing shared by the `job_worker` binary and its tests.
//!
//! The worker polls the `async_jobs` table, claims the oldest queued job via
//! a conditional update (two workers can never grab the same row), runs it,
//! and records the terminal state. Retryable failures (storage hiccups, a
//! busy database) are requeued while attempts remain; everything else is
//! marked FAILED with the error preserved for the status poller.

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::domain::job::JobType;
use crate::repository::errors::RepositoryError;
use crate::repository::{
    CartWriter, CategoryWriter, JobWriter, OrderReader, ProductWriter, SupplierWriter,
};
use crate::services::storage::FileStorage;

pub mod export;
pub mod import;

/// A job is retried at most this many times before it fails for good.
pub const MAX_JOB_ATTEMPTS: i32 = 3;

/// RUNNING jobs older than this are considered orphaned by a dead worker.
pub const STALE_CLAIM_SECS: i64 = 600;

#[derive(Debug, Error)]
pub enum JobError {
    /// Worth another attempt: transient storage or database trouble.
    #[error("{0}")]
    Retryable(String),
    /// Bad input or corrupt state; retrying would fail the same way.
    #[error("{0}")]
    Fatal(String),
}

/// Housekeeping run on every worker tick: orphaned jobs are requeued or
/// failed, and expired anonymous carts are reaped.
pub fn run_maintenance<R>(repo: &R)
where
    R: JobWriter + CartWriter + ?Sized,
{
    let now = Utc::now().naive_utc();
    let cutoff = now - Duration::seconds(STALE_CLAIM_SECS);

    match repo.recover_stale_jobs(cutoff, MAX_JOB_ATTEMPTS, now) {
        Ok(0) => {}
        Ok(requeued) => log::warn!("requeued {requeued} stale jobs"),
        Err(err) => log::error!("Failed to recover stale jobs: {err}"),
    }

    match repo.delete_expired_session_carts(now) {
        Ok(0) => {}
        Ok(removed) => log::info!("removed {removed} expired session carts"),
        Err(err) => log::error!("Failed to clean up session carts: {err}"),
    }
}

/// Claims and runs one job. Returns `false` when the queue was empty.
pub fn process_next<R, S>(repo: &R, storage: &S) -> Result<bool, RepositoryError>
where
    R: JobWriter + OrderReader + ProductWriter + CategoryWriter + SupplierWriter + ?Sized,
    S: FileStorage + ?Sized,
{
    let Some(job) = repo.claim_next_job(Utc::now().naive_utc())? else {
        return Ok(false);
    };

    log::info!(
        "processing job {} ({}), attempt {}",
        job.id,
        job.job_type,
        job.attempts
    );

    let outcome = match job.job_type {
        JobType::ExportOrders => export::run(repo, storage, &job.params),
        JobType::ImportProducts => import::run(repo, storage, &job.params),
    };

    let now = Utc::now().naive_utc();
    match outcome {
        Ok(result_url) => {
            repo.finish_job_success(&job.id, result_url.as_deref(), now)?;
            log::info!("job {} finished", job.id);
        }
        Err(JobError::Retryable(message)) if job.attempts < MAX_JOB_ATTEMPTS => {
            log::warn!(
                "job {} attempt {} failed, requeueing: {message}",
                job.id,
                job.attempts
            );
            repo.requeue_job(&job.id)?;
        }
        Err(err) => {
            log::error!("job {} failed: {err}", job.id);
            repo.finish_job_failed(&job.id, &err.to_string(), now)?;
        }
    }

    Ok(true)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::job::{Job, JobStatus};
    use crate::domain::types::JobId;
    use crate::repository::mock::MockRepository;
    use crate::services::storage::LocalStorage;
    use serde_json::json;

    fn running_job(job_type: JobType, params: serde_json::Value, attempts: i32) -> Job {
        Job {
            id: JobId::generate(),
            job_type,
            status: JobStatus::Running,
            params,
            attempts,
            result_url: None,
            error: None,
            created_at: Utc::now().naive_utc(),
            finished_at: None,
        }
    }

    #[test]
    fn empty_queue_is_a_noop() {
        let mut repo = MockRepository::new();
        repo.expect_claim_next_job().returning(|_| Ok(None));

        let storage = LocalStorage::new(std::env::temp_dir(), "/media");
        assert!(!process_next(&repo, &storage).unwrap());
    }

    #[test]
    fn fatal_error_fails_the_job() {
        let mut repo = MockRepository::new();
        let job = running_job(JobType::ImportProducts, json!({}), 1);
        let job_id = job.id;

        repo.expect_claim_next_job()
            .returning(move |_| Ok(Some(job.clone())));
        repo.expect_finish_job_failed()
            .times(1)
            .withf(move |id, error, _| *id == job_id && error.contains("file"))
            .returning(|_, _, _| Ok(()));

        let storage = LocalStorage::new(std::env::temp_dir(), "/media");
        assert!(process_next(&repo, &storage).unwrap());
    }

    #[test]
    fn retryable_error_requeues_while_attempts_remain() {
        let mut repo = MockRepository::new();
        let job = running_job(
            JobType::ImportProducts,
            json!({"file": "/nonexistent/path/import.csv"}),
            1,
        );
        let job_id = job.id;

        repo.expect_claim_next_job()
            .returning(move |_| Ok(Some(job.clone())));
        repo.expect_requeue_job()
            .times(1)
            .withf(move |id| *id == job_id)
            .returning(|_| Ok(()));

        let storage = LocalStorage::new(std::env::temp_dir(), "/media");
        assert!(process_next(&repo, &storage).unwrap());
    }

    #[test]
    fn retryable_error_fails_after_last_attempt() {
        let mut repo = MockRepository::new();
        let job = running_job(
            JobType::ImportProducts,
            json!({"file": "/nonexistent/path/import.csv"}),
            MAX_JOB_ATTEMPTS,
        );

        repo.expect_claim_next_job()
            .returning(move |_| Ok(Some(job.clone())));
        repo.expect_finish_job_failed()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let storage = LocalStorage::new(std::env::temp_dir(), "/media");
        assert!(process_next(&repo, &storage).unwrap());
    }

    #[test]
    fn export_success_records_result_url() {
        let mut repo = MockRepository::new();
        let job = running_job(JobType::ExportOrders, json!({}), 1);

        repo.expect_claim_next_job()
            .returning(move |_| Ok(Some(job.clone())));
        repo.expect_list_orders_with_users()
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_finish_job_success()
            .times(1)
            .withf(|_, url, _| url.is_some_and(|u| u.contains("orders_")))
            .returning(|_, _, _| Ok(()));

        let dir = std::env::temp_dir().join(format!("parranda-worker-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(&dir, "/media");
        assert!(process_next(&repo, &storage).unwrap());
        std::fs::remove_dir_all(&dir).ok();
    }
}
