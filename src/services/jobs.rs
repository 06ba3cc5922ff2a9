//! Enqueueing and inspecting async import/export jobs.
//!
//! Heavy lifting happens in the worker binary; these services only validate
//! input, persist what the worker needs, and answer the status poller.

use crate::domain::job::{ExportOrdersParams, Job, JobType, NewJob};
use crate::domain::types::JobId;
use crate::forms::admin::ExportOrdersForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{JobReader, JobWriter};
use crate::services::orders::parse_date;
use crate::services::storage::FileStorage;
use crate::services::{ServiceError, ServiceResult, ensure_admin};

/// Header every product import file must carry, in this exact order.
pub const IMPORT_HEADER: [&str; 7] = [
    "name_uz",
    "name_ru",
    "category",
    "supplier",
    "image_url",
    "description",
    "status",
];

/// Queues an orders export with the posted filters.
pub fn start_export<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &ExportOrdersForm,
) -> ServiceResult<Job>
where
    R: JobWriter + ?Sized,
{
    ensure_admin(user)?;

    let mut params = ExportOrdersParams {
        user_id: form.user_id,
        ..Default::default()
    };
    if let Some(raw) = Some(form.status.trim()).filter(|s| !s.is_empty()) {
        params.status = Some(
            raw.try_into()
                .map_err(|_| ServiceError::Form(format!("invalid status: {raw}")))?,
        );
    }
    if let Some(raw) = Some(form.date_from.trim()).filter(|s| !s.is_empty()) {
        params.date_from = Some(parse_date(raw)?);
    }
    if let Some(raw) = Some(form.date_to.trim()).filter(|s| !s.is_empty()) {
        params.date_to = Some(parse_date(raw)?);
    }

    let params = serde_json::to_value(&params)
        .map_err(|e| ServiceError::Internal(format!("failed to encode job params: {e}")))?;

    repo.enqueue_job(&NewJob::new(JobType::ExportOrders, params))
        .map_err(ServiceError::from)
}

/// Stores the uploaded CSV and queues a product import over it.
pub fn start_import<R, S>(
    repo: &R,
    storage: &S,
    user: &AuthenticatedUser,
    filename: &str,
    data: &[u8],
) -> ServiceResult<Job>
where
    R: JobWriter + ?Sized,
    S: FileStorage + ?Sized,
{
    ensure_admin(user)?;

    if !filename.to_lowercase().ends_with(".csv") {
        return Err(ServiceError::Form(
            "only .csv files are supported".to_string(),
        ));
    }
    if data.is_empty() {
        return Err(ServiceError::Form("uploaded file is empty".to_string()));
    }

    let stored = storage
        .save_bytes(data, "products_import.csv")
        .map_err(|e| ServiceError::Internal(format!("failed to store upload: {e}")))?;

    let params = serde_json::json!({ "file": stored.path.to_string_lossy() });

    repo.enqueue_job(&NewJob::new(JobType::ImportProducts, params))
        .map_err(ServiceError::from)
}

/// Poll target: current state of a job. Unknown and malformed ids both read
/// as not-found so the endpoint leaks nothing.
pub fn job_status<R>(repo: &R, user: &AuthenticatedUser, raw_id: &str) -> ServiceResult<Job>
where
    R: JobReader + ?Sized,
{
    ensure_admin(user)?;

    let id: JobId = raw_id.parse().map_err(|_| ServiceError::NotFound)?;
    repo.get_job(&id)?.ok_or(ServiceError::NotFound)
}

/// The downloadable import template with a couple of example rows.
pub fn import_template_csv() -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let _ = writer.write_record(IMPORT_HEADER);
    let _ = writer.write_record([
        "Tovuq filesi",
        "Куриное филе",
        "File",
        "Parranda Farm",
        "",
        "",
        "true",
    ]);
    let _ = writer.write_record([
        "Tovuq soni",
        "Куриные бедра",
        "Son",
        "Parranda Farm",
        "",
        "",
        "false",
    ]);
    match writer.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}
