use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::dto::main::ProductsQuery;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template, service_error_response};
use crate::services::main as main_service;

#[derive(Deserialize)]
struct ProductsQueryParams {
    category: Option<i32>,
    q: Option<String>,
    page: Option<usize>,
}

#[get("/")]
pub async fn show_index(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    let data = match main_service::load_home(repo.get_ref()) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(&flash_messages, user.as_ref(), "home");
    context.insert("categories", &data.categories);
    context.insert("featured", &data.featured);

    render_template(&tera, "main/index.html", &context)
}

#[get("/products")]
pub async fn show_products(
    params: web::Query<ProductsQueryParams>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    let params = params.into_inner();
    let query = ProductsQuery {
        category: params.category,
        search: params.q,
        page: params.page,
    };

    let data = match main_service::load_products_page(repo.get_ref(), query) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/products"),
    };

    let mut context = base_context(&flash_messages, user.as_ref(), "products");
    context.insert("categories", &data.categories);
    context.insert("products", &data.products);
    context.insert("selected_category", &data.selected_category);
    context.insert("search_query", &data.search_query);

    render_template(&tera, "main/products.html", &context)
}
