use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::info;

use ks_api::app::{create_app, AppState};
use ks_core::services::KeyProvider;
use ks_infra::database::{DatabasePool, MySqlUserRepository};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = ks_api::config::load()?;

    // Initialize logger; RUST_LOG takes precedence over the configured level
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::new().default_filter_or(config.logging.level.as_str()),
    );
    if !config.logging.timestamp {
        logger.format_timestamp(None);
    }
    logger.init();

    info!(
        "Starting Keystone API Server ({} environment)",
        config.environment
    );

    // Keys are loaded once here so a bad key fails startup, not the first request
    let keys = Arc::new(KeyProvider::from_files(
        &config.jwt.private_key_path,
        &config.jwt.public_key_path,
    ));
    keys.preload().context("Failed to load signing keys")?;
    info!("Signing keys loaded");

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the user store")?;
    let users = Arc::new(MySqlUserRepository::from_pool(&pool));

    let state = web::Data::new(AppState::new(&config, keys, users));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()))
        .keep_alive(std::time::Duration::from_secs(config.server.keep_alive))
        .shutdown_timeout(config.server.shutdown_timeout);
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}
