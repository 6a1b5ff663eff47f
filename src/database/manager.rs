use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    /// The row targeted by an update or delete does not exist.
    #[error("Record to update or delete not found: {0}")]
    RecordNotFound(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    pub fn is_record_not_found(&self) -> bool {
        is_record_not_found(self)
    }
}

/// True iff `err` is the store's "record to update/delete not found" signal.
///
/// This is the only place a storage-level miss is recognised; callers map it
/// to a 404 and everything else to a 500.
pub fn is_record_not_found(err: &DatabaseError) -> bool {
    matches!(
        err,
        DatabaseError::RecordNotFound(_) | DatabaseError::Sqlx(sqlx::Error::RowNotFound)
    )
}

/// Builds the connection pool handed to repositories at startup
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect a pool using the resolved database URL and pool settings
    pub async fn connect(settings: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = Self::database_url()?;

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connection_timeout))
            .connect(&url)
            .await?;

        info!(
            "Created database pool (max_connections={})",
            settings.max_connections
        );
        Ok(pool)
    }

    /// Apply the embedded migrations under ./migrations
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Resolve the connection URL from the process environment
    pub fn database_url() -> Result<String, DatabaseError> {
        Self::database_url_from(|key| std::env::var(key).ok())
    }

    /// `DATABASE_URL` wins; otherwise assemble one from the libpq variables
    /// `PGHOST`, `PGDATABASE`, `PGUSER`, `PGPASSWORD` (all required) plus the
    /// optional `PGSSLMODE` and `PGCHANNELBINDING`.
    fn database_url_from<F>(lookup: F) -> Result<String, DatabaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = lookup("DATABASE_URL") {
            return Ok(url);
        }

        let host = lookup("PGHOST").ok_or(DatabaseError::ConfigMissing("DATABASE_URL or PGHOST"))?;
        let database = lookup("PGDATABASE").ok_or(DatabaseError::ConfigMissing("PGDATABASE"))?;
        let user = lookup("PGUSER").ok_or(DatabaseError::ConfigMissing("PGUSER"))?;
        let password = lookup("PGPASSWORD").ok_or(DatabaseError::ConfigMissing("PGPASSWORD"))?;

        let mut url = url::Url::parse(&format!("postgresql://{}", host))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_path(&format!("/{}", database));
        url.set_username(&user)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_password(Some(&password))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let params: Vec<(&str, String)> = [("sslmode", "PGSSLMODE"), ("channel_binding", "PGCHANNELBINDING")]
            .into_iter()
            .filter_map(|(param, key)| lookup(key).map(|v| (param, v)))
            .collect();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url.into())
    }
}
