//! Backend entry-point: loads settings, wires storage, and serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use habits_backend::inbound::http::health::HealthState;
use habits_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("failed to load server settings")?;
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;
    let mut config = ServerConfig::new(bind_addr);

    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations {
            run_pending_migrations(database_url)
                .await
                .wrap_err("failed to apply database migrations")?;
        }
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, storage = config.storage().describe(), "starting server");
    create_server(health_state, config)?.await?;
    Ok(())
}
