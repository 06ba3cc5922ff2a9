use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::cart::CartItemForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, redirect, render_template, service_error_response, session_cart_key,
};
use crate::services::cart as cart_service;

#[get("/cart")]
pub async fn show_cart(
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    let session_key = session_cart_key(&session);
    let cart = match cart_service::load_cart(repo.get_ref(), user.as_ref(), &session_key) {
        Ok(cart) => cart,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(&flash_messages, user.as_ref(), "cart");
    context.insert("cart", &cart);

    render_template(&tera, "cart/index.html", &context)
}

#[post("/cart/items")]
pub async fn set_cart_item(
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CartItemForm>,
) -> impl Responder {
    let session_key = session_cart_key(&session);
    match cart_service::set_item(repo.get_ref(), user.as_ref(), &session_key, &form) {
        Ok(_) => {
            FlashMessage::success("Cart updated.".to_string()).send();
            redirect("/cart")
        }
        Err(err) => service_error_response(err, "/products"),
    }
}

#[post("/cart/items/{product_id}/remove")]
pub async fn remove_cart_item(
    path: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();
    let session_key = session_cart_key(&session);
    match cart_service::remove_item(repo.get_ref(), user.as_ref(), &session_key, product_id) {
        Ok(_) => redirect("/cart"),
        Err(err) => service_error_response(err, "/cart"),
    }
}
