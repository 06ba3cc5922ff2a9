use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::profile::ProfileForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::profile as profile_service;

#[get("/profile")]
pub async fn show_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> impl Responder {
    let profile = match profile_service::load_profile(repo.get_ref(), &user) {
        Ok(profile) => profile,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(&flash_messages, Some(&user), "profile");
    context.insert("profile", &profile);

    render_template(&tera, "profile/index.html", &context)
}

#[post("/profile")]
pub async fn save_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProfileForm>,
) -> impl Responder {
    match profile_service::save_profile(repo.get_ref(), &user, &form) {
        Ok(_) => {
            FlashMessage::success("Profile saved.".to_string()).send();
            redirect("/profile")
        }
        Err(err) => service_error_response(err, "/profile"),
    }
}
