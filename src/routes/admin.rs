//! Admin dashboard, user management and the import/export job endpoints.

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use tera::Tera;

use crate::dto::admin::AdminUsersQuery;
use crate::dto::api::EnqueuedJobResponse;
use crate::forms::admin::{ChangeRoleForm, ExportOrdersForm, ImportProductsForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::storage::LocalStorage;
use crate::services::{ServiceError, admin as admin_service, jobs as jobs_service};
use serde::Deserialize;

#[get("/admin")]
pub async fn dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    let today = Local::now().date_naive();
    let summary = match admin_service::summary(repo.get_ref(), &user, today) {
        Ok(summary) => summary,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(&flash_messages, Some(&user), "admin");
    context.insert("summary", &summary);

    render_template(&tera, "admin/dashboard.html", &context)
}

#[derive(Deserialize)]
struct UsersQueryParams {
    role: Option<String>,
    user_type: Option<String>,
    q: Option<String>,
    page: Option<usize>,
}

#[get("/admin/users")]
pub async fn users(
    params: web::Query<UsersQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    let params = params.into_inner();
    let query = AdminUsersQuery {
        role: params.role,
        user_type: params.user_type,
        search: params.q,
        page: params.page,
    };

    let data = match admin_service::list_users(repo.get_ref(), &user, query) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/admin"),
    };

    let mut context = base_context(&flash_messages, Some(&user), "admin_users");
    context.insert("users", &data.users);
    context.insert("search_query", &data.search_query);

    render_template(&tera, "admin/users.html", &context)
}

#[post("/admin/users/{id}/role")]
pub async fn change_user_role(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ChangeRoleForm>,
) -> impl Responder {
    let target_id = path.into_inner();
    match admin_service::change_role(repo.get_ref(), &user, target_id, &form.role) {
        Ok(updated) => {
            FlashMessage::success(format!(
                "Role of {} changed to {}.",
                updated.username, updated.role
            ))
            .send();
            redirect("/admin/users")
        }
        Err(err) => service_error_response(err, "/admin/users"),
    }
}

/// Kicks off an orders export; the page script polls the returned job id.
#[post("/admin/export/orders")]
pub async fn export_orders(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ExportOrdersForm>,
) -> impl Responder {
    match jobs_service::start_export(repo.get_ref(), &user, &form) {
        Ok(job) => HttpResponse::Accepted().json(EnqueuedJobResponse {
            job_id: job.id.to_string(),
            status: job.status.to_string(),
        }),
        Err(err) => job_error_response(err),
    }
}

/// Accepts a CSV upload and queues a product import over it.
#[post("/admin/import/products")]
pub async fn import_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: web::Data<LocalStorage>,
    MultipartForm(form): MultipartForm<ImportProductsForm>,
) -> impl Responder {
    let filename = form.file.file_name.clone().unwrap_or_default();

    // Re-read by path: the temp file handle sits at EOF after the upload.
    let data = match std::fs::read(form.file.file.path()) {
        Ok(data) => data,
        Err(err) => {
            log::error!("Failed to read upload: {err}");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "detail": "could not read uploaded file"
            }));
        }
    };

    match jobs_service::start_import(repo.get_ref(), storage.get_ref(), &user, &filename, &data) {
        Ok(job) => HttpResponse::Accepted().json(EnqueuedJobResponse {
            job_id: job.id.to_string(),
            status: job.status.to_string(),
        }),
        Err(err) => job_error_response(err),
    }
}

#[get("/admin/import/products/template")]
pub async fn import_template(user: AuthenticatedUser) -> impl Responder {
    if !user.role.is_admin() {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"product_import_template.csv\"",
        ))
        .body(jobs_service::import_template_csv())
}

/// The job endpoints speak JSON, so form errors become 400 payloads instead
/// of flash messages.
fn job_error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(detail) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "detail": detail }))
        }
        ServiceError::Internal(message) => {
            log::error!("Internal error: {message}");
            HttpResponse::InternalServerError().finish()
        }
        ServiceError::Repository(err) => {
            log::error!("Repository error: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
