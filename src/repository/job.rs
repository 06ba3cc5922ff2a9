//! Repository implementation for the async job queue.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::job::{Job, JobStatus, NewJob};
use crate::domain::types::JobId;
use crate::models::job::{Job as DbJob, NewJob as DbNewJob};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, JobReader, JobWriter};

fn into_domain(db_job: DbJob) -> RepositoryResult<Job> {
    Job::try_from(db_job).map_err(RepositoryError::from)
}

impl JobReader for DieselRepository {
    fn get_job(&self, id: &JobId) -> RepositoryResult<Option<Job>> {
        use crate::schema::async_jobs;

        let mut conn = self.conn()?;
        let db_job = async_jobs::table
            .find(id.to_string())
            .first::<DbJob>(&mut conn)
            .optional()?;

        db_job.map(into_domain).transpose()
    }
}

impl JobWriter for DieselRepository {
    fn enqueue_job(&self, new_job: &NewJob) -> RepositoryResult<Job> {
        use crate::schema::async_jobs;

        let mut conn = self.conn()?;
        let db_new: DbNewJob = new_job.into();
        let created = diesel::insert_into(async_jobs::table)
            .values(&db_new)
            .get_result::<DbJob>(&mut conn)?;

        into_domain(created)
    }

    fn claim_next_job(&self, now: NaiveDateTime) -> RepositoryResult<Option<Job>> {
        use crate::schema::async_jobs;

        let mut conn = self.conn()?;
        let claimed = conn.immediate_transaction::<Option<DbJob>, diesel::result::Error, _>(
            |conn| {
                let candidate = async_jobs::table
                    .filter(async_jobs::status.eq(JobStatus::Pending.as_str()))
                    .order(async_jobs::created_at.asc())
                    .select(async_jobs::id)
                    .first::<String>(conn)
                    .optional()?;

                let Some(id) = candidate else {
                    return Ok(None);
                };

                // The status guard makes the claim atomic: a concurrent
                // worker that won the race leaves nothing to update here.
                let claimed = diesel::update(
                    async_jobs::table
                        .find(id.as_str())
                        .filter(async_jobs::status.eq(JobStatus::Pending.as_str())),
                )
                .set((
                    async_jobs::status.eq(JobStatus::Running.as_str()),
                    async_jobs::attempts.eq(async_jobs::attempts + 1),
                    async_jobs::claimed_at.eq(now),
                ))
                .get_result::<DbJob>(conn)
                .optional()?;

                Ok(claimed)
            },
        )?;

        claimed.map(into_domain).transpose()
    }

    fn finish_job_success(
        &self,
        id: &JobId,
        result_url: Option<&str>,
        now: NaiveDateTime,
    ) -> RepositoryResult<()> {
        use crate::schema::async_jobs;

        let mut conn = self.conn()?;
        diesel::update(async_jobs::table.find(id.to_string()))
            .set((
                async_jobs::status.eq(JobStatus::Success.as_str()),
                async_jobs::result_url.eq(result_url),
                async_jobs::finished_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    fn finish_job_failed(
        &self,
        id: &JobId,
        error: &str,
        now: NaiveDateTime,
    ) -> RepositoryResult<()> {
        use crate::schema::async_jobs;

        // Error text is capped so a runaway import report cannot bloat the row.
        let mut error = error.to_string();
        error.truncate(4000);

        let mut conn = self.conn()?;
        diesel::update(async_jobs::table.find(id.to_string()))
            .set((
                async_jobs::status.eq(JobStatus::Failed.as_str()),
                async_jobs::error.eq(error),
                async_jobs::finished_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    fn requeue_job(&self, id: &JobId) -> RepositoryResult<()> {
        use crate::schema::async_jobs;

        let mut conn = self.conn()?;
        diesel::update(async_jobs::table.find(id.to_string()))
            .set((
                async_jobs::status.eq(JobStatus::Pending.as_str()),
                async_jobs::claimed_at.eq(None::<NaiveDateTime>),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    fn recover_stale_jobs(
        &self,
        cutoff: NaiveDateTime,
        max_attempts: i32,
        now: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        use crate::schema::async_jobs;

        let mut conn = self.conn()?;

        diesel::update(
            async_jobs::table
                .filter(async_jobs::status.eq(JobStatus::Running.as_str()))
                .filter(async_jobs::claimed_at.lt(cutoff))
                .filter(async_jobs::attempts.ge(max_attempts)),
        )
        .set((
            async_jobs::status.eq(JobStatus::Failed.as_str()),
            async_jobs::error.eq("worker timed out"),
            async_jobs::finished_at.eq(now),
        ))
        .execute(&mut conn)?;

        let requeued = diesel::update(
            async_jobs::table
                .filter(async_jobs::status.eq(JobStatus::Running.as_str()))
                .filter(async_jobs::claimed_at.lt(cutoff))
                .filter(async_jobs::attempts.lt(max_attempts)),
        )
        .set((
            async_jobs::status.eq(JobStatus::Pending.as_str()),
            async_jobs::claimed_at.eq(None::<NaiveDateTime>),
        ))
        .execute(&mut conn)?;

        Ok(requeued)
    }
}
