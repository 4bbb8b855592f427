use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::errors::ModelError;

/// Open a pooled connection from the supplied configuration. The config
/// struct is the only source of connection parameters here; reading the
/// environment is the caller's concern.
pub async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection, ModelError> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);

    let db = Database::connect(opts)
        .await
        .map_err(|e| ModelError::Connection(e.to_string()))?;
    info!(pool_max = cfg.max_connections, "database connection established");
    Ok(db)
}
