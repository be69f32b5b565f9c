//! Background worker draining the outbound email queue and driving scheduled
//! campaigns through their lifecycle.

use std::env;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use config::Config;
use dotenvy::dotenv;

use pushkind_church::db::establish_connection_pool;
use pushkind_church::models::config::ServerConfig;
use pushkind_church::relay::ZmqRelay;
use pushkind_church::repository::DieselRepository;
use pushkind_church::services::campaign::{finalize_sending_campaigns, promote_due_campaigns};
use pushkind_church::services::email_queue::process_due_batch;

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
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

    let relay = match ZmqRelay::start(
        &server_config.zmq_emailer_pub,
        &server_config.zmq_push_pub,
    ) {
        Ok(relay) => relay,
        Err(e) => {
            log::error!("Failed to start relay publisher: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);
    let tick = Duration::from_secs(server_config.worker_tick_seconds);

    log::info!("Starting dispatch worker");

    loop {
        let now = Utc::now().naive_utc();

        match promote_due_campaigns(&repo, &relay, now) {
            Ok(promoted) if promoted > 0 => {
                log::info!("Promoted {promoted} scheduled campaigns");
            }
            Ok(_) => {}
            Err(e) => log::error!("Error promoting scheduled campaigns: {e}"),
        }

        match process_due_batch(
            &repo,
            &relay,
            &server_config.sender_domain,
            server_config.queue_batch_size,
            server_config.queue_max_attempts,
            now,
        ) {
            Ok(report) if report.processed > 0 => {
                log::info!(
                    "Queue batch: {} processed, {} sent, {} failed",
                    report.processed,
                    report.sent,
                    report.failed
                );
            }
            Ok(_) => {}
            Err(e) => log::error!("Error processing email queue: {e}"),
        }

        match finalize_sending_campaigns(&repo) {
            Ok(completed) if completed > 0 => {
                log::info!("Completed {completed} campaigns");
            }
            Ok(_) => {}
            Err(e) => log::error!("Error finalizing campaigns: {e}"),
        }

        thread::sleep(tick);
    }
}
