use anyhow::Result;
use std::time::Duration;
use tokio::{net::TcpListener, signal, sync::watch};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use indoor_climate_service::{
    api::{self, AppState},
    calibration,
    config::Config,
    db,
    reading_cache::ReadingCache,
    sampler::SamplerService,
    sensor::{Bme680, SensorSettings, SimulatedBme680},
    store::PgTimeSeriesStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (ignore error if file absent — env vars may be set externally)
    let _ = dotenvy::dotenv();

    // Initialise tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env()?;

    // Connect to DB and run migrations. No sink means no service: fail fast
    // here rather than sample into the void.
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database ready");

    // The device handle. The simulated driver stands in off-device; an I²C
    // hardware adapter implementing `Bme680` plugs in here on a Pi.
    let mut sensor = SimulatedBme680::new();
    sensor.configure(&SensorSettings::default())?;

    // Blocking precondition: the calibrator owns the sensor exclusively for
    // the whole burn-in window; sampling starts only once a baseline exists.
    let gas_baseline =
        calibration::burn_in(&mut sensor, Duration::from_secs(config.burn_in_secs)).await?;

    // Shared latest-reading cache (sampler writes, API reads).
    let cache = ReadingCache::new();

    // Spawn the acquisition loop with a cooperative stop signal.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sampler = SamplerService::new(
        sensor,
        PgTimeSeriesStore::new(pool.clone()),
        cache.clone(),
        gas_baseline,
        Duration::from_secs(config.sample_interval_secs),
    )?;
    let sampler_task = tokio::spawn(sampler.run(shutdown_rx));

    // Start HTTP server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, api::router(AppState::new(pool.clone(), cache)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the sampler at tick granularity, then release the storage handle.
    let _ = shutdown_tx.send(true);
    sampler_task.await?;
    pool.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
