//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_batch_size() -> usize {
    20
}

fn default_max_attempts() -> i32 {
    3
}

fn default_tick_seconds() -> u64 {
    60
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers and the dispatch worker.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub secret: String,
    pub auth_service_url: String,
    /// PUB endpoint the email delivery relay subscribes to.
    pub zmq_emailer_pub: String,
    /// PUB endpoint the mobile push relay subscribes to.
    pub zmq_push_pub: String,
    /// Sender domain used to build outbound account addresses.
    pub sender_domain: String,
    #[serde(default = "default_batch_size")]
    pub queue_batch_size: usize,
    #[serde(default = "default_max_attempts")]
    pub queue_max_attempts: i32,
    #[serde(default = "default_tick_seconds")]
    pub worker_tick_seconds: u64,
}
