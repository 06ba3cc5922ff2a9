use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::db::establish_connection_pool;
use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::admin::{
    change_user_role, dashboard, export_orders, import_products, import_template, users,
};
use crate::routes::admin_categories::{add_category, categories, delete_category, save_category};
use crate::routes::admin_orders::{orders, set_order_status};
use crate::routes::admin_products::{add_product, delete_product, products, save_product};
use crate::routes::admin_suppliers::{add_supplier, delete_supplier, save_supplier, suppliers};
use crate::routes::api::{job_status, products_search, telegram_contact};
use crate::routes::auth::{logout, show_signin, show_signup, signin, signup};
use crate::routes::cart::{remove_cart_item, set_cart_item, show_cart};
use crate::routes::main::{show_index, show_products};
use crate::routes::orders::{checkout, reorder, show_order, show_orders};
use crate::routes::profile::{save_profile, show_profile};
use crate::services::storage::LocalStorage;

pub mod db;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod worker;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Diesel connection pool for the SQLite database shared with the worker.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);
    let storage = LocalStorage::new(&server_config.media_dir, &server_config.media_base_url);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    let media_dir = server_config.media_dir.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(Files::new("/media", media_dir.clone()))
            .service(
                web::scope("/api")
                    .service(job_status)
                    .service(telegram_contact)
                    .service(products_search),
            )
            // Public storefront: browsing and the cart work without an account.
            .service(show_index)
            .service(show_products)
            .service(show_signin)
            .service(signin)
            .service(show_signup)
            .service(signup)
            .service(show_cart)
            .service(set_cart_item)
            .service(remove_cart_item)
            // Everything below requires a signed-in user.
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(logout)
                    .service(checkout)
                    .service(show_orders)
                    .service(show_order)
                    .service(reorder)
                    .service(show_profile)
                    .service(save_profile)
                    .service(dashboard)
                    .service(orders)
                    .service(set_order_status)
                    .service(products)
                    .service(add_product)
                    .service(save_product)
                    .service(delete_product)
                    .service(categories)
                    .service(add_category)
                    .service(save_category)
                    .service(delete_category)
                    .service(suppliers)
                    .service(add_supplier)
                    .service(save_supplier)
                    .service(delete_supplier)
                    .service(users)
                    .service(change_user_role)
                    .service(export_orders)
                    .service(import_products)
                    .service(import_template),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
