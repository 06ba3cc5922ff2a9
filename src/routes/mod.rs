//! HTTP handlers and the small helpers they share.

use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpResponse, http::header::ContentType};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};
use uuid::Uuid;

use crate::models::auth::AuthenticatedUser;
use crate::services::ServiceError;

pub mod admin;
pub mod admin_categories;
pub mod admin_orders;
pub mod admin_products;
pub mod admin_suppliers;
pub mod api;
pub mod auth;
pub mod cart;
pub mod main;
pub mod orders;
pub mod profile;

/// Maps flash levels onto the alert classes the templates use.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// `303 See Other` to the given location.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Renders a template, logging failures instead of leaking them to users.
pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body),
        Err(err) => {
            log::error!("Failed to render {name}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context shared by every page: alerts, the signed-in user, active nav item.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context
}

/// Anonymous visitors get a generated cart key pinned to their session
/// cookie; it correlates their server-side session cart across requests.
pub fn session_cart_key(session: &Session) -> String {
    const KEY: &str = "cart_key";

    if let Ok(Some(existing)) = session.get::<String>(KEY) {
        return existing;
    }
    let fresh = Uuid::new_v4().to_string();
    if let Err(err) = session.insert(KEY, &fresh) {
        log::error!("Failed to persist session cart key: {err}");
    }
    fresh
}

/// Default translation of a service error into an HTML response. `back` is
/// where form errors land after the flash message is queued.
pub fn service_error_response(err: ServiceError, back: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(back)
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
