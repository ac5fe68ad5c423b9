// Bootstrap utilities for wiring the data layer at application startup

use crate::config::Settings;
use crate::db::repositories::PropertyRepository;
use crate::db::DbPool;
use crate::store::PgRentalStore;
use crate::telemetry;
use anyhow::{Context, Result};
use tracing::info;

/// Load and validate settings from `config/` and `APP__*` environment variables
pub fn load_settings() -> Result<Settings> {
    let settings = Settings::load().context("Failed to load configuration")?;
    settings
        .validate()
        .map_err(|reason| anyhow::anyhow!("Invalid configuration: {}", reason))?;
    Ok(settings)
}

/// Initialize logging, and metrics when a port is configured
pub fn init_telemetry(settings: &Settings) -> Result<()> {
    let observability = &settings.observability;
    telemetry::init_logging(
        &observability.log_level,
        observability.tracing_endpoint.as_deref(),
    )?;

    if let Some(port) = observability.metrics_port {
        telemetry::init_metrics(port)?;
    }

    Ok(())
}

/// Initialize database pool
///
/// # Errors
/// Returns error if database pool initialization fails
#[tracing::instrument(skip(settings))]
pub async fn init_database_pool(settings: &Settings) -> Result<DbPool> {
    info!("Initializing database pool");

    let db_pool = DbPool::new(&settings.database)
        .await
        .context("Failed to initialize database pool")?;

    info!("Database pool initialized");
    Ok(db_pool)
}

/// Log a handful of property titles as a startup check
///
/// An empty result is fine; an error means the schema is missing or the
/// connection is unusable.
#[tracing::instrument(skip(db_pool))]
pub async fn log_sample_titles(db_pool: &DbPool) -> Result<Vec<String>> {
    let titles = PropertyRepository::new(db_pool.clone())
        .sample_titles(10)
        .await
        .context("Startup title query failed")?;

    info!(count = titles.len(), titles = ?titles, "Startup query returned property titles");
    Ok(titles)
}

/// Connect, optionally migrate, check, and return a ready store
#[tracing::instrument(skip(settings))]
pub async fn init_store(settings: &Settings, run_migrations: bool) -> Result<PgRentalStore> {
    let db_pool = init_database_pool(settings).await?;

    if run_migrations {
        db_pool
            .run_migrations()
            .await
            .context("Failed to apply database migrations")?;
    }

    db_pool
        .health_check()
        .await
        .context("Database health check failed")?;
    log_sample_titles(&db_pool).await?;

    Ok(PgRentalStore::new(db_pool))
}

/// Close the pool and flush any pending spans
pub async fn shutdown(db_pool: &DbPool) {
    info!("Shutting down data layer");
    db_pool.close().await;
    telemetry::shutdown_tracer();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_settings_without_config_dir_uses_defaults() {
        if std::env::vars().any(|(key, _)| key.starts_with("APP__")) {
            return;
        }
        let settings = load_settings().unwrap();
        assert_eq!(settings.database.url, Settings::default().database.url);
    }

    #[test]
    fn test_default_settings_carry_no_credentials() {
        let url = Settings::default().database.url;
        assert!(!url.contains('@'), "default url has credentials: {url}");
    }

    #[test]
    fn test_init_telemetry_rejects_invalid_log_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let mut settings = Settings::default();
        settings.observability.log_level = "lightbnb_common=loudest".to_string();

        let err = init_telemetry(&settings).unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[tokio::test]
    async fn test_shutdown_closes_pool() {
        let db_pool = DbPool::lazy("postgresql://localhost/lightbnb").unwrap();
        assert!(!db_pool.pool().is_closed());

        shutdown(&db_pool).await;
        assert!(db_pool.pool().is_closed());
    }

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL instance
    async fn test_init_store_runs_startup_query() {
        let mut settings = Settings::default();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            settings.database.url = url;
        }

        let store = init_store(&settings, true).await;
        assert!(store.is_ok());
    }
}
