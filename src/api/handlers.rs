//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::alert::AlertError;
use crate::state::AppState;

use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /start - Begin a session with a freshly sampled target
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("start");
    match state.controller.start() {
        Ok(()) => {
            info!("Start endpoint called - session running");
            Ok(Json(ApiResponse::ok(
                "Session started".to_string(),
                state.controller.snapshot(),
            )))
        }
        Err(AlertError::PermissionDenied) => {
            error!("Start rejected: alert permission denied");
            Err(StatusCode::FORBIDDEN)
        }
        Err(e) => {
            error!("Failed to start session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - End the session and cancel all pending alerts
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.record_action("stop");
    state.controller.stop();
    info!("Stop endpoint called - session stopped");
    Json(ApiResponse::ok(
        "Session stopped".to_string(),
        state.controller.snapshot(),
    ))
}

/// Handle POST /hide - User looks away from the readout
pub async fn hide_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.record_action("hide");
    state.controller.set_hidden(true);
    Json(ApiResponse::ok(
        "Readout hidden".to_string(),
        state.controller.snapshot(),
    ))
}

/// Handle POST /reveal - User looks at the readout again
pub async fn reveal_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.record_action("reveal");
    state.controller.set_hidden(false);
    Json(ApiResponse::ok(
        "Readout revealed".to_string(),
        state.controller.snapshot(),
    ))
}

/// Handle POST /bounds/lower/{minutes} - Set the minimum sit length
pub async fn lower_bound_handler(
    State(state): State<Arc<AppState>>,
    Path(minutes): Path<u64>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("bounds-lower");
    if state.controller.set_lower_bound(minutes) {
        Ok(Json(ApiResponse::ok(
            "Lower bound updated".to_string(),
            state.controller.snapshot(),
        )))
    } else {
        warn!("Lower bound change rejected while a session is active");
        Err(StatusCode::CONFLICT)
    }
}

/// Handle POST /bounds/upper/{minutes} - Set the maximum sit length
pub async fn upper_bound_handler(
    State(state): State<Arc<AppState>>,
    Path(minutes): Path<u64>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("bounds-upper");
    if state.controller.set_upper_bound(minutes) {
        Ok(Json(ApiResponse::ok(
            "Upper bound updated".to_string(),
            state.controller.snapshot(),
        )))
    } else {
        warn!("Upper bound change rejected while a session is active");
        Err(StatusCode::CONFLICT)
    }
}

/// Handle GET /status - Return the current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.controller.snapshot();
    let readout = timer.readout();
    let (last_action, last_action_time) = match state.last_action() {
        Some((action, time)) => (Some(action), Some(time)),
        None => (None, None),
    };

    Json(StatusResponse {
        timer,
        readout,
        policy: state.controller.policy(),
        uptime: state.uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
