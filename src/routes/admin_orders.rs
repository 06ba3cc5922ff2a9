use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::admin::AdminOrdersQuery;
use crate::forms::orders::OrderStatusForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::orders as orders_service;

#[derive(Deserialize)]
struct AdminOrdersQueryParams {
    status: Option<String>,
    user_id: Option<i32>,
    date_from: Option<String>,
    date_to: Option<String>,
    page: Option<usize>,
}

#[get("/admin/orders")]
pub async fn orders(
    params: web::Query<AdminOrdersQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    let params = params.into_inner();
    let query = AdminOrdersQuery {
        status: params.status,
        user_id: params.user_id,
        date_from: params.date_from,
        date_to: params.date_to,
        page: params.page,
    };

    let data = match orders_service::admin_orders(repo.get_ref(), &user, query) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/admin"),
    };

    let mut context = base_context(&flash_messages, Some(&user), "admin_orders");
    context.insert("orders", &data.orders);
    context.insert("status_filter", &data.status_filter);

    render_template(&tera, "admin/orders.html", &context)
}

#[post("/admin/orders/{id}/status")]
pub async fn set_order_status(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<OrderStatusForm>,
) -> impl Responder {
    let order_id = path.into_inner();
    match orders_service::advance_status(repo.get_ref(), &user, order_id, &form.status) {
        Ok(updated) => {
            FlashMessage::success(format!(
                "Order {} is now {}.",
                updated.order_number, updated.status
            ))
            .send();
            redirect("/admin/orders")
        }
        Err(err) => service_error_response(err, "/admin/orders"),
    }
}
