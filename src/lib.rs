pub mod authz;
pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod tracing_config;
pub mod utils;

use std::sync::Arc;

use config::Config;
use db::DBClient;

pub use routes::create_router;

#[derive(Clone)]
pub struct AppState {
    pub env: Arc<Config>,
    pub db_client: DBClient,
}
