//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers and the job worker.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// Directory where export files and import reports are written.
    pub media_dir: String,
    /// Public URL prefix under which `media_dir` is served.
    pub media_base_url: String,
    /// Secret for session cookies and JWT signing.
    pub secret: String,
    /// Seconds a login token stays valid.
    pub token_ttl_secs: i64,
    /// Telegram account handling manual fulfillment, without the `@`.
    pub fulfillment_telegram: String,
    /// Job worker poll interval in seconds.
    pub worker_poll_secs: u64,
}
