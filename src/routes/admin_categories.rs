use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::admin::PanelQuery;
use crate::forms::categories::CategoryForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::categories as categories_service;

#[derive(Deserialize)]
struct PanelQueryParams {
    q: Option<String>,
    page: Option<usize>,
}

#[get("/admin/categories")]
pub async fn categories(
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

    let data = match categories_service::load_panel(repo.get_ref(), &user, query) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/admin"),
    };

    let mut context = base_context(&flash_messages, Some(&user), "admin_categories");
    context.insert("categories", &data.categories);
    context.insert("search_query", &data.search_query);

    render_template(&tera, "admin/categories.html", &context)
}

#[post("/admin/categories/add")]
pub async fn add_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    match categories_service::create(repo.get_ref(), &user, &form) {
        Ok(_) => {
            FlashMessage::success("Category added.".to_string()).send();
            redirect("/admin/categories")
        }
        Err(err) => service_error_response(err, "/admin/categories"),
    }
}

#[post("/admin/categories/{id}")]
pub async fn save_category(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let id = path.into_inner();
    match categories_service::update(repo.get_ref(), &user, id, &form) {
        Ok(_) => {
            FlashMessage::success("Category saved.".to_string()).send();
            redirect("/admin/categories")
        }
        Err(err) => service_error_response(err, "/admin/categories"),
    }
}

#[post("/admin/categories/{id}/delete")]
pub async fn delete_category(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = path.into_inner();
    match categories_service::delete(repo.get_ref(), &user, id) {
        Ok(()) => {
            FlashMessage::success("Category deleted.".to_string()).send();
            redirect("/admin/categories")
        }
        Err(err) => service_error_response(err, "/admin/categories"),
    }
}
