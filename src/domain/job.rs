use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::order::OrderStatus;
use crate::domain::types::{JobId, TypeConstraintError};

/// Kind of background work a job row describes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobType {
    ExportOrders,
    ImportProducts,
}

impl JobType {
    pub const fn as_str(self) -> &'static str {
        match self {
            JobType::ExportOrders => "EXPORT_ORDERS",
            JobType::ImportProducts => "IMPORT_PRODUCTS",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobType {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "EXPORT_ORDERS" => Ok(JobType::ExportOrders),
            "IMPORT_PRODUCTS" => Ok(JobType::ImportProducts),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown job type: {other}"
            ))),
        }
    }
}

/// Job lifecycle. PENDING and RUNNING are non-terminal; the poller keeps
/// asking until it sees SUCCESS or FAILED.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl JobStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Success => "SUCCESS",
            JobStatus::Failed => "FAILED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(JobStatus::Pending),
            "RUNNING" => Ok(JobStatus::Running),
            "SUCCESS" => Ok(JobStatus::Success),
            "FAILED" => Ok(JobStatus::Failed),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown job status: {other}"
            ))),
        }
    }
}

/// A tracked background job as stored in the queue table.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub job_type: JobType,
    pub status: JobStatus,
    pub params: serde_json::Value,
    pub attempts: i32,
    pub result_url: Option<String>,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug)]
pub struct NewJob {
    pub id: JobId,
    pub job_type: JobType,
    pub params: serde_json::Value,
}

impl NewJob {
    pub fn new(job_type: JobType, params: serde_json::Value) -> Self {
        Self {
            id: JobId::generate(),
            job_type,
            params,
        }
    }
}

/// Optional filters an admin can apply to the orders export.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ExportOrdersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}
