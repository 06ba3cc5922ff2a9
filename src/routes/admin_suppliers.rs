use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::admin::PanelQuery;
use crate::forms::suppliers::SupplierForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::suppliers as suppliers_service;

#[derive(Deserialize)]
struct PanelQueryParams {
    q: Option<String>,
    page: Option<usize>,
}

#[get("/admin/suppliers")]
pub async fn suppliers(
    params: web::Query<PanelQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    let params = params.into_inner();
    let query = PanelQuery {
        search: params.q,
        page: params.page,
    };

    let data = match suppliers_service::load_panel(repo.get_ref(), &user, query) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/admin"),
    };

    let mut context = base_context(&flash_messages, Some(&user), "admin_suppliers");
    context.insert("suppliers", &data.suppliers);
    context.insert("search_query", &data.search_query);

    render_template(&tera, "admin/suppliers.html", &context)
}

#[post("/admin/suppliers/add")]
pub async fn add_supplier(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SupplierForm>,
) -> impl Responder {
    match suppliers_service::create(repo.get_ref(), &user, &form) {
        Ok(_) => {
            FlashMessage::success("Supplier added.".to_string()).send();
            redirect("/admin/suppliers")
        }
        Err(err) => service_error_response(err, "/admin/suppliers"),
    }
}

#[post("/admin/suppliers/{id}")]
pub async fn save_supplier(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SupplierForm>,
) -> impl Responder {
    let id = path.into_inner();
    match suppliers_service::update(repo.get_ref(), &user, id, &form) {
        Ok(_) => {
            FlashMessage::success("Supplier saved.".to_string()).send();
            redirect("/admin/suppliers")
        }
        Err(err) => service_error_response(err, "/admin/suppliers"),
    }
}

#[post("/admin/suppliers/{id}/delete")]
pub async fn delete_supplier(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = path.into_inner();
    match suppliers_service::delete(repo.get_ref(), &user, id) {
        Ok(()) => {
            FlashMessage::success("Supplier deleted.".to_string()).send();
            redirect("/admin/suppliers")
        }
        Err(err) => service_error_response(err, "/admin/suppliers"),
    }
}
