use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;

#[derive(Deserialize)]
/// Superadmin form assigning a new role to a user.
pub struct ChangeRoleForm {
    pub role: String,
}

#[derive(Deserialize)]
/// Filters for the orders export job; empty fields mean "all".
pub struct ExportOrdersForm {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub date_from: String,
    #[serde(default)]
    pub date_to: String,
}

#[derive(MultipartForm)]
/// CSV upload kicking off a product import job.
pub struct ImportProductsForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
}
