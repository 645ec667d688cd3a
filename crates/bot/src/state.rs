/// Shared state for the keep-alive HTTP routes.
#[derive(Clone)]
pub struct AppState {
    /// Render job store.
    pub pool: renderq_db::DbPool,
}
