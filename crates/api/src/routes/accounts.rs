use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/register", post(handlers::accounts::register))
        .route("/api/login", post(handlers::accounts::login))
        .route(
            "/api/profile/:id",
            get(handlers::accounts::get_profile).put(handlers::accounts::update_profile),
        )
}
