//! Backend entry-point: loads configuration, prepares storage and serves the
//! enrollment pages.

mod server;

use std::time::Duration;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use enrollment_backend::inbound::http::health::HealthState;
use enrollment_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use enrollment_backend::outbound::memory::InMemoryStore;
use enrollment_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{
    AppSettings, ServerConfig, Storage, build_catalogue_service, create_server,
    load_catalogue_seed,
};

const POOL_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let storage = build_storage(&settings).await?;
    if let Some(path) = settings.catalogue_seed.as_deref() {
        let seeds = load_catalogue_seed(path).map_err(std::io::Error::other)?;
        let created = build_catalogue_service(&storage)
            .seed_if_empty(&seeds)
            .await
            .map_err(|e| std::io::Error::other(format!("catalogue seeding failed: {e}")))?;
        info!(path = %path.display(), created, "catalogue seed processed");
    }

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
        storage,
    );
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(fail_liveness_on_shutdown(health_state));
    info!(addr = %settings.bind_addr(), "enrollment backend listening");
    server.await
}

/// Fail the liveness probe once Ctrl-C arrives; actix drains in-flight
/// requests on its own.
async fn fail_liveness_on_shutdown(health: web::Data<HealthState>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            health.mark_unhealthy();
            info!("shutdown requested; liveness probe now failing");
        }
        Err(error) => warn!(%error, "failed to listen for shutdown signal"),
    }
}

async fn build_storage(settings: &AppSettings) -> std::io::Result<Storage> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("ENROLLMENT_DATABASE_URL unset; using the in-memory store");
        return Ok(Storage::Memory(InMemoryStore::new()));
    };

    run_pending_migrations(database_url)
        .await
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(settings.pool_max_size)
            .with_connection_timeout(POOL_CHECKOUT_TIMEOUT),
    )
    .await
    .map_err(|e| std::io::Error::other(e.into_message()))?;
    Ok(Storage::Postgres(pool))
}
