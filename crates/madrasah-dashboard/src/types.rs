use crate::dashboard::Dashboard;

/// Shared state handed to every request handler.
pub struct AppState {
    pub dashboard: Dashboard,
}
