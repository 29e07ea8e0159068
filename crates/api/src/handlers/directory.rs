use axum::{Json, extract::State};
use educonnect_core::models::directory::{SearchQuery, SearchResponse};
use std::sync::Arc;

use crate::{
    ApiState,
    middleware::{
        auth::Caller,
        error_handling::{ApiQuery, AppError},
    },
    services,
};

#[axum::debug_handler]
pub async fn search(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let results = services::directory::search(state.store.as_ref(), &caller, params).await?;

    Ok(Json(SearchResponse { results }))
}
