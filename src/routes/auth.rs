use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::auth::{SigninForm, SignupForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::auth as auth_service;

#[get("/auth/signin")]
pub async fn show_signin(
    user: Option<AuthenticatedUser>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "signin");
    render_template(&tera, "auth/signin.html", &context)
}

#[post("/auth/signin")]
pub async fn signin(
    request: HttpRequest,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SigninForm>,
) -> impl Responder {
    let user = match auth_service::login(repo.get_ref(), &form) {
        Ok(user) => user,
        Err(err) => return service_error_response(err, "/auth/signin"),
    };

    let claims = AuthenticatedUser::new(&user, config.token_ttl_secs);
    let token = match claims.to_jwt(&config.secret) {
        Ok(token) => token,
        Err(err) => {
            log::error!("Failed to issue token: {err}");
            return redirect("/auth/signin");
        }
    };
    if let Err(err) = Identity::login(&request.extensions(), token) {
        log::error!("Failed to attach identity: {err}");
        return redirect("/auth/signin");
    }

    if user.role.is_admin() {
        redirect("/admin")
    } else {
        redirect("/")
    }
}

#[get("/auth/signup")]
pub async fn show_signup(
    user: Option<AuthenticatedUser>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "signup");
    render_template(&tera, "auth/signup.html", &context)
}

#[post("/auth/signup")]
pub async fn signup(
    request: HttpRequest,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SignupForm>,
) -> impl Responder {
    let user = match auth_service::register(repo.get_ref(), &form) {
        Ok(user) => user,
        Err(err) => return service_error_response(err, "/auth/signup"),
    };

    // Freshly registered customers land signed in.
    let claims = AuthenticatedUser::new(&user, config.token_ttl_secs);
    match claims.to_jwt(&config.secret) {
        Ok(token) => {
            if let Err(err) = Identity::login(&request.extensions(), token) {
                log::error!("Failed to attach identity: {err}");
            }
        }
        Err(err) => log::error!("Failed to issue token: {err}"),
    }

    FlashMessage::success("Welcome! Your account is ready.".to_string()).send();
    redirect("/")
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}
