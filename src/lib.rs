use config::Config;
use sqlx::SqlitePool;

pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod utils;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}
