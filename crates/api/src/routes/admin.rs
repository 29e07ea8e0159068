use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/admin/tutors", get(handlers::admin::list_tutors))
        .route("/api/admin/students", get(handlers::admin::list_students))
        .route(
            "/api/admin/users/:id/verify",
            put(handlers::admin::verify_tutor),
        )
        .route(
            "/api/admin/session-requests",
            get(handlers::admin::list_session_requests),
        )
        .route("/api/admin/feedbacks", get(handlers::admin::list_feedback))
        .route("/api/admin/summary", get(handlers::admin::summary))
}
