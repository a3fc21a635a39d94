use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::server::endpoints::{dashboard, status};
use crate::types::AppState;

mod endpoints;
mod types;

pub use endpoints::dashboard::SESSION_HEADER;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let dashboard_router = Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/dashboard/state", get(dashboard::get_dashboard_state));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(dashboard_router)
        .with_state(app_state)
}
