//! Background worker draining the async job queue.
//!
//! Runs as a separate process against the same SQLite file as the HTTP
//! server. Each tick it recovers orphaned jobs, reaps expired session carts,
//! then drains the queue before sleeping for the poll interval.

use std::env;
use std::time::Duration;

use config::Config;
use dotenvy::dotenv;

use parranda_market::db::establish_connection_pool;
use parranda_market::models::config::ServerConfig;
use parranda_market::repository::DieselRepository;
use parranda_market::services::storage::LocalStorage;
use parranda_market::worker::{process_next, run_maintenance};

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("Failed to establish database connection: {err}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);
    let storage = LocalStorage::new(&server_config.media_dir, &server_config.media_base_url);
    let poll_interval = Duration::from_secs(server_config.worker_poll_secs.max(1));

    log::info!("Starting job worker");

    loop {
        run_maintenance(&repo);

        loop {
            match process_next(&repo, &storage) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    log::error!("Job processing error: {err}");
                    break;
                }
            }
        }

        std::thread::sleep(poll_interval);
    }
}
