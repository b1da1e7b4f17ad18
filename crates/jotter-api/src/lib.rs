pub mod auth;
pub mod error;
pub mod middleware;
pub mod notes;
pub mod routes;
pub mod users;

use std::sync::Arc;

use jotter_auth::AuthConfig;
use jotter_db::{NoteStore, UserStore};

pub use error::ApiError;
pub use routes::router;

pub type AppState = Arc<AppStateInner>;

/// Everything a handler can reach. Built once at startup; the stores are
/// picked by the caller (SQLite in production, [`jotter_db::MemoryStore`] in
/// tests).
pub struct AppStateInner {
    pub users: Arc<dyn UserStore>,
    pub notes: Arc<dyn NoteStore>,
    pub auth: AuthConfig,
}

/// Run blocking store or hashing work off the async runtime.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.to_string())
    })?
}
