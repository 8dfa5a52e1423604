use crate::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::path::Path;
use thiserror::Error;

/// Errors raised while opening or migrating the storefront database
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to create database pool: {0}")]
    PoolCreation(sqlx::Error),

    #[error("Timed out waiting for a database connection")]
    ConnectionTimeout,

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

fn connect_error(err: sqlx::Error) -> DatabaseError {
    match err {
        sqlx::Error::PoolTimedOut => DatabaseError::ConnectionTimeout,
        other => DatabaseError::PoolCreation(other),
    }
}

/// Open the pool and run a round trip so a bad `DATABASE_URL` fails at boot
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .test_before_acquire(config.test_before_acquire)
        .connect(&config.url)
        .await
        .map_err(connect_error)?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(connect_error)?;

    Ok(pool)
}

/// Apply the migrations found under `migrations_path`
pub async fn run_migrations(pool: &PgPool, migrations_path: &str) -> Result<(), DatabaseError> {
    let migrator = sqlx::migrate::Migrator::new(Path::new(migrations_path)).await?;
    migrator.run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_reported_as_timeout() {
        assert!(matches!(
            connect_error(sqlx::Error::PoolTimedOut),
            DatabaseError::ConnectionTimeout
        ));
        assert!(matches!(
            connect_error(sqlx::Error::PoolClosed),
            DatabaseError::PoolCreation(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_migrations_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_such_migrations");
        let err = sqlx::migrate::Migrator::new(missing.as_path()).await.unwrap_err();
        let err: DatabaseError = err.into();
        assert!(matches!(err, DatabaseError::Migration(_)));
    }
}
