use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use serde::Deserialize;
use tera::Tera;

use crate::dto::orders::OrdersQuery;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::{orders as orders_service, telegram};

#[derive(Deserialize)]
struct OrdersQueryParams {
    page: Option<usize>,
}

#[post("/orders/checkout")]
pub async fn checkout(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let today = Local::now().date_naive();
    match orders_service::checkout(repo.get_ref(), &user, today) {
        Ok(placed) => {
            FlashMessage::success(format!("Order {} placed.", placed.order.order_number)).send();
            redirect(&format!("/orders/{}", placed.order.id))
        }
        Err(err) => service_error_response(err, "/cart"),
    }
}

#[get("/orders")]
pub async fn show_orders(
    params: web::Query<OrdersQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    let query = OrdersQuery { page: params.page };
    let data = match orders_service::my_orders(repo.get_ref(), &user, query) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(&flash_messages, Some(&user), "orders");
    context.insert("orders", &data.orders);

    render_template(&tera, "orders/index.html", &context)
}

#[get("/orders/{id}")]
pub async fn show_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    let order_id = path.into_inner();
    let data = match orders_service::order_detail(repo.get_ref(), &user, order_id) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/orders"),
    };

    let mut context = base_context(&flash_messages, Some(&user), "orders");
    context.insert("order", &data.order);
    context.insert("telegram_text", &data.telegram_text);
    context.insert("telegram_link", &data.telegram_link);
    context.insert(
        "fulfillment_link",
        &telegram::chat_link(&config.fulfillment_telegram),
    );

    render_template(&tera, "orders/detail.html", &context)
}

#[post("/orders/{id}/reorder")]
pub async fn reorder(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = path.into_inner();
    match orders_service::reorder(repo.get_ref(), &user, order_id) {
        Ok(_) => {
            FlashMessage::success("Items added to your cart.".to_string()).send();
            redirect("/cart")
        }
        Err(err) => service_error_response(err, "/orders"),
    }
}
