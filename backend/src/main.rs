//! Backend entry-point: migrates the database, wires the catalogue, account
//! and import endpoints, and serves the OpenAPI document.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use car_catalogue::config::AppSettings;
use car_catalogue::inbound::http::health::HealthState;
use car_catalogue::inbound::http::session_config::{
    BuildMode, key_fingerprint, session_settings_from_env,
};
use car_catalogue::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let database_url = settings.database_url()?;
    let applied = run_migrations(database_url)
        .await
        .wrap_err("failed to apply migrations")?;
    info!(applied, "database schema is current");

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()?),
    )
    .await
    .wrap_err("failed to build the connection pool")?;

    let bind_addr = settings.bind_addr()?;
    let state = build_http_state(&pool, settings.import_path());
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(session, bind_addr, state))
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    server.await?;
    Ok(())
}

#[cfg(test)]
mod tests;
