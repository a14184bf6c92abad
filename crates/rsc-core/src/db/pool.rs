//! Database connection pool management.

use rsc_connectors::SecureString;
use std::time::Duration;

#[cfg(feature = "database")]
use super::DbError;

/// Where and as whom to connect to the network service datastore.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecureString,
    pub database: String,
}

/// Options for creating a database connection pool.
///
/// An audit issues its queries one after another, so the pool stays small.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Maximum time to wait for a connection.
    pub acquire_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        let acquire_timeout_secs = std::env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self {
            max_connections: 2,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        }
    }
}

#[cfg(feature = "database")]
pub type DbPool = sqlx::MySqlPool;

/// Creates a MySQL connection pool with default options.
#[cfg(feature = "database")]
pub async fn create_pool(settings: &ConnectionSettings) -> Result<DbPool, DbError> {
    create_pool_with_options(settings, PoolOptions::default()).await
}

/// Creates a MySQL connection pool and opens its first connection.
#[cfg(feature = "database")]
pub async fn create_pool_with_options(
    settings: &ConnectionSettings,
    options: PoolOptions,
) -> Result<DbPool, DbError> {
    use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
    use tracing::info;

    if settings.host.is_empty() {
        return Err(DbError::Configuration("database host is empty".to_string()));
    }

    let connect = MySqlConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.username)
        .password(settings.password.expose_secret())
        .database(&settings.database)
        .charset("utf8");

    info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        "Creating MySQL connection pool"
    );

    let pool = MySqlPoolOptions::new()
        .max_connections(options.max_connections)
        .acquire_timeout(options.acquire_timeout)
        .connect_with(connect)
        .await?;
    Ok(pool)
}
