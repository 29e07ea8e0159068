use axum::{Json, extract::State, http::StatusCode};
use educonnect_core::models::session::{
    CreateSessionResponse, GetSessionResponse, ListSessionRequestsQuery,
    ListSessionRequestsResponse, NewSessionRequest, RespondRequest, RespondResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::Caller,
        error_handling::{ApiJson, ApiPath, ApiQuery, AppError},
    },
    services,
};

#[axum::debug_handler]
pub async fn create_session_request(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiJson(payload): ApiJson<NewSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let created = services::session::create(state.store.as_ref(), &caller, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            message: "Session request sent successfully".to_string(),
            session_request_id: created.id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn respond_to_session_request(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<RespondRequest>,
) -> Result<Json<RespondResponse>, AppError> {
    let updated =
        services::session::respond(state.store.as_ref(), &caller, id, &payload.status).await?;

    Ok(Json(RespondResponse {
        message: format!("Session request {}", updated.status),
        session_request: updated,
    }))
}

#[axum::debug_handler]
pub async fn get_session_request(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<GetSessionResponse>, AppError> {
    let session = services::session::fetch(state.store.as_ref(), &caller, id).await?;

    Ok(Json(GetSessionResponse { session }))
}

#[axum::debug_handler]
pub async fn list_session_requests(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiQuery(query): ApiQuery<ListSessionRequestsQuery>,
) -> Result<Json<ListSessionRequestsResponse>, AppError> {
    let requests =
        services::session::list_for_participant(state.store.as_ref(), &caller, query).await?;

    Ok(Json(ListSessionRequestsResponse { requests }))
}
