use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::job::{Job as DomainJob, JobStatus, JobType, NewJob as DomainNewJob};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::async_jobs)]
/// Diesel model for [`crate::domain::job::Job`].
pub struct Job {
    pub id: String,
    pub job_type: String,
    pub status: String,
    pub params: String,
    pub attempts: i32,
    pub claimed_at: Option<NaiveDateTime>,
    pub result_url: Option<String>,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::async_jobs)]
pub struct NewJob {
    pub id: String,
    pub job_type: String,
    pub status: String,
    pub params: String,
}

impl TryFrom<Job> for DomainJob {
    type Error = TypeConstraintError;

    fn try_from(job: Job) -> Result<Self, Self::Error> {
        Ok(Self {
            id: job.id.parse()?,
            job_type: JobType::try_from(job.job_type.as_str())?,
            status: JobStatus::try_from(job.status.as_str())?,
            params: serde_json::from_str(&job.params)
                .map_err(|e| TypeConstraintError::InvalidValue(format!("bad job params: {e}")))?,
            attempts: job.attempts,
            result_url: job.result_url,
            error: job.error,
            created_at: job.created_at,
            finished_at: job.finished_at,
        })
    }
}

impl From<&DomainNewJob> for NewJob {
    fn from(job: &DomainNewJob) -> Self {
        Self {
            id: job.id.to_string(),
            job_type: job.job_type.to_string(),
            status: JobStatus::Pending.to_string(),
            params: job.params.to_string(),
        }
    }
}
