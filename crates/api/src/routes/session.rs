use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/session/request",
            post(handlers::session::create_session_request),
        )
        .route(
            "/api/session/:id/respond",
            put(handlers::session::respond_to_session_request),
        )
        .route("/api/session/:id", get(handlers::session::get_session_request))
        .route(
            "/api/session/:id/feedback",
            post(handlers::feedback::submit_feedback),
        )
        .route(
            "/api/session-requests",
            get(handlers::session::list_session_requests),
        )
}
