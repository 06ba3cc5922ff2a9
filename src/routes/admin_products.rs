use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::admin::PanelQuery;
use crate::forms::products::ProductForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::products as products_service;

#[derive(Deserialize)]
struct PanelQueryParams {
    q: Option<String>,
    page: Option<usize>,
}

#[get("/admin/products")]
pub async fn products(
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

    let data = match products_service::load_panel(repo.get_ref(), &user, query) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/admin"),
    };

    let mut context = base_context(&flash_messages, Some(&user), "admin_products");
    context.insert("products", &data.products);
    context.insert("categories", &data.categories);
    context.insert("suppliers", &data.suppliers);
    context.insert("search_query", &data.search_query);

    render_template(&tera, "admin/products.html", &context)
}

#[post("/admin/products/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    match products_service::create(repo.get_ref(), &user, &form) {
        Ok(_) => {
            FlashMessage::success("Product added.".to_string()).send();
            redirect("/admin/products")
        }
        Err(err) => service_error_response(err, "/admin/products"),
    }
}

#[post("/admin/products/{id}")]
pub async fn save_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let id = path.into_inner();
    match products_service::update(repo.get_ref(), &user, id, &form) {
        Ok(_) => {
            FlashMessage::success("Product saved.".to_string()).send();
            redirect("/admin/products")
        }
        Err(err) => service_error_response(err, "/admin/products"),
    }
}

#[post("/admin/products/{id}/delete")]
pub async fn delete_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = path.into_inner();
    match products_service::delete(repo.get_ref(), &user, id) {
        Ok(()) => {
            FlashMessage::success("Product deleted.".to_string()).send();
            redirect("/admin/products")
        }
        Err(err) => service_error_response(err, "/admin/products"),
    }
}
