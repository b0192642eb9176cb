use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: linkumkm_db::DbPool,
    /// Server configuration (JWT, cookie and storage settings).
    pub config: Arc<ServerConfig>,
    /// Where uploaded images are written.
    pub store: Arc<dyn UploadStore>,
}
