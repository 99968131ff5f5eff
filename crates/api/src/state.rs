use std::sync::Arc;

use gitscribe_ai::ReadmeGenerator;
use gitscribe_db::store::{QuotaStore, ReadmeStore};
use gitscribe_packer::Packer;
use sqlx::PgPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// The store and service fields are trait objects so tests can swap in
/// in-memory and canned implementations.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks).
    pub pool: PgPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Daily generation quota accounting.
    pub quota: Arc<dyn QuotaStore>,
    /// Generated README persistence.
    pub readmes: Arc<dyn ReadmeStore>,
    /// Repository packing service client.
    pub packer: Arc<dyn Packer>,
    /// Streaming README generator.
    pub generator: Arc<dyn ReadmeGenerator>,
}
