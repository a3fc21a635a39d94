//! API endpoints for the dashboard view models.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::dashboard::SessionContext;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Header carrying the caller's session blob (`{"role": .., "id": ..}`).
pub const SESSION_HEADER: &str = "x-dashboard-session";

fn session_from_headers(headers: &HeaderMap) -> SessionContext {
    let raw = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok());
    SessionContext::from_store(raw)
}

/// GET /dashboard
///
/// Runs one refresh for the caller and returns their published state.
pub async fn get_dashboard(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let context = session_from_headers(&headers);
    info!("GET /dashboard (role={:?})", context.role);

    match s.dashboard.refresh(&context).await {
        Ok(state) => (StatusCode::OK, Json(state)).into_response(),
        Err(e) => {
            warn!("Dashboard refresh failed: {}", e);
            ApiErrorType::from((
                StatusCode::BAD_GATEWAY,
                e.user_message(),
                e.source_name().map(str::to_string),
            ))
            .into_response()
        }
    }
}

/// GET /dashboard/state
///
/// Returns the caller's last published state without refreshing.
pub async fn get_dashboard_state(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let context = session_from_headers(&headers);
    (StatusCode::OK, Json(s.dashboard.state(&context).await)).into_response()
}
