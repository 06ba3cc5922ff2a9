//! Payload shapes of the JSON endpoints under `/api/v1`.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::job::Job;

/// Response the admin page poller consumes every two seconds.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub status: String,
    pub result_url: Option<String>,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
}

impl From<&Job> for JobResponse {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.to_string(),
            job_type: job.job_type.to_string(),
            status: job.status.to_string(),
            result_url: job.result_url.clone(),
            error: job.error.clone(),
            created_at: job.created_at,
            finished_at: job.finished_at,
        }
    }
}

/// Returned with `202 Accepted` when a job is enqueued.
#[derive(Debug, Serialize)]
pub struct EnqueuedJobResponse {
    pub job_id: String,
    pub status: String,
}

/// Admin-side Telegram contact card for an order's customer.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TelegramContactResponse {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub order_number: String,
    pub message_text: String,
    pub telegram_link: String,
}
