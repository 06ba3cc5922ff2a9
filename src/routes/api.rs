//! JSON endpoints under `/api/v1` consumed by in-page scripts.

use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::dto::api::JobResponse;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{DieselRepository, ProductListQuery, ProductReader};
use crate::services::{ServiceError, jobs as jobs_service, orders as orders_service};

/// Poll target for the admin import/export panel. The page script hits this
/// every two seconds until the payload reports SUCCESS or FAILED.
#[get("/v1/jobs/{id}")]
pub async fn job_status(
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let raw_id = path.into_inner();
    match jobs_service::job_status(repo.get_ref(), &user, &raw_id) {
        Ok(job) => HttpResponse::Ok().json(JobResponse::from(&job)),
        Err(err) => api_error_response(err),
    }
}

/// Admin contact card for the customer behind an order.
#[get("/v1/orders/{id}/telegram-contact")]
pub async fn telegram_contact(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = path.into_inner();
    match orders_service::telegram_contact(repo.get_ref(), &user, order_id) {
        Ok(card) => HttpResponse::Ok().json(card),
        Err(err) => api_error_response(err),
    }
}

#[derive(Deserialize)]
struct ProductsQueryParams {
    query: String,
}

/// Product name search backing the admin quick-search box.
#[get("/v1/products")]
pub async fn products_search(
    params: web::Query<ProductsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if !user.role.is_admin() {
        return HttpResponse::Unauthorized().finish();
    }

    let query = ProductListQuery::new().search(params.query.trim());
    match repo.list_products(query) {
        Ok((_, products)) => HttpResponse::Ok().json(products),
        Err(err) => {
            log::error!("Failed to search products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn api_error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => {
            HttpResponse::NotFound().json(serde_json::json!({ "detail": "Not found" }))
        }
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
