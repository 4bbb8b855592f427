use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::store::{LastTouched, SeaOrmBackend, UserStore};

use crate::routes::{self, AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration from config.toml, falling back to env vars when
/// no file is present. The environment is read only here; everything
/// below this point receives the config struct.
fn load_config() -> anyhow::Result<configs::AppConfig> {
    match configs::load_default() {
        Ok(mut cfg) => {
            cfg.normalize_and_validate()?;
            Ok(cfg)
        }
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            cfg.server.host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            cfg.server.port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            cfg.database.normalize_from_env();
            cfg.database.validate()?;
            Ok(cfg)
        }
    }
}

fn bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

/// Public entry: connect, provision the schema, build the app and run
/// the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config()?;

    let db = models::db::connect(&cfg.database).await?;
    // The original bootstrapped its database and collection on boot;
    // here the migrator provisions the record table.
    migration::Migrator::up(&db, None).await?;

    let store = Arc::new(UserStore::new(
        Arc::new(SeaOrmBackend::new(db)),
        Arc::new(LastTouched::default()),
    ));
    let state = AppState { store };

    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "starting record service");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
