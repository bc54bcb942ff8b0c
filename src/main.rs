use clap::Parser;
use tracing::error;

use sensor_hub::common::logging::{init_logger, LogLevel};
use sensor_hub::config::Settings;
use sensor_hub::data::ReadingStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let settings = Settings::parse();

    //We have to keep the worker_guard alive
    let _worker_guard = if settings.log_level != LogLevel::No {
        init_logger(settings.log_level, &settings.log_file).unwrap_or_else(|e| {
            eprintln!("Couldn't init logger: {:#}", e);
            std::process::exit(1);
        })
    } else {
        None
    };

    let store = ReadingStore::open(&settings.database, settings.pool_size).unwrap_or_else(|e| {
        error!("Couldn't init db: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = sensor_hub::server::serve(&settings, store).await {
        error!("Server stopped: {:#}", e);
        std::process::exit(1);
    }
}
