//! Admin console handlers. They all take a [`MaybeCaller`] so that a missing
//! or unknown identity is denied exactly like a non-admin one. Path, query and
//! body extraction results are only inspected after the guard has passed.

use axum::{Json, extract::State};
use educonnect_core::models::{
    admin::{
        AdminFeedbackResponse, AdminSessionRequestsResponse, AdminSummary, StudentsResponse,
        TutorsResponse, UsersQuery, UsersResponse, VerifyTutorRequest, VerifyTutorResponse,
    },
    user::Role,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::{MaybeCaller, Operation, authorize},
        error_handling::{ApiJson, ApiPath, ApiQuery, AppError},
    },
    services,
};

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
    MaybeCaller(caller): MaybeCaller,
    query: Result<ApiQuery<UsersQuery>, AppError>,
) -> Result<Json<UsersResponse>, AppError> {
    // Deny before looking at the filter so non-admins never see a 400.
    authorize(caller.map(|c| c.role), Operation::ListUsers)?;
    let ApiQuery(query) = query?;
    let role = query.role.as_deref().map(str::parse::<Role>).transpose()?;
    let users = services::admin::list_users(state.store.as_ref(), caller.as_ref(), role).await?;

    Ok(Json(UsersResponse { users }))
}

#[axum::debug_handler]
pub async fn list_tutors(
    State(state): State<Arc<ApiState>>,
    MaybeCaller(caller): MaybeCaller,
) -> Result<Json<TutorsResponse>, AppError> {
    let tutors =
        services::admin::list_users(state.store.as_ref(), caller.as_ref(), Some(Role::Tutor))
            .await?;

    Ok(Json(TutorsResponse { tutors }))
}

#[axum::debug_handler]
pub async fn list_students(
    State(state): State<Arc<ApiState>>,
    MaybeCaller(caller): MaybeCaller,
) -> Result<Json<StudentsResponse>, AppError> {
    let students =
        services::admin::list_users(state.store.as_ref(), caller.as_ref(), Some(Role::Student))
            .await?;

    Ok(Json(StudentsResponse { students }))
}

#[axum::debug_handler]
pub async fn verify_tutor(
    State(state): State<Arc<ApiState>>,
    MaybeCaller(caller): MaybeCaller,
    id: Result<ApiPath<Uuid>, AppError>,
    payload: Result<ApiJson<VerifyTutorRequest>, AppError>,
) -> Result<Json<VerifyTutorResponse>, AppError> {
    authorize(caller.map(|c| c.role), Operation::VerifyTutor)?;
    let ApiPath(id) = id?;
    let ApiJson(payload) = payload?;

    let user = services::admin::verify_tutor(
        state.store.as_ref(),
        caller.as_ref(),
        id,
        &payload.verification_status,
    )
    .await?;

    Ok(Json(VerifyTutorResponse {
        message: "Tutor verification status updated".to_string(),
        user,
    }))
}

#[axum::debug_handler]
pub async fn list_session_requests(
    State(state): State<Arc<ApiState>>,
    MaybeCaller(caller): MaybeCaller,
) -> Result<Json<AdminSessionRequestsResponse>, AppError> {
    let session_requests =
        services::session::list_all(state.store.as_ref(), caller.as_ref()).await?;

    Ok(Json(AdminSessionRequestsResponse { session_requests }))
}

#[axum::debug_handler]
pub async fn list_feedback(
    State(state): State<Arc<ApiState>>,
    MaybeCaller(caller): MaybeCaller,
) -> Result<Json<AdminFeedbackResponse>, AppError> {
    let feedbacks = services::feedback::list_all(state.store.as_ref(), caller.as_ref()).await?;

    Ok(Json(AdminFeedbackResponse { feedbacks }))
}

#[axum::debug_handler]
pub async fn summary(
    State(state): State<Arc<ApiState>>,
    MaybeCaller(caller): MaybeCaller,
) -> Result<Json<AdminSummary>, AppError> {
    let summary = services::admin::summary(state.store.as_ref(), caller.as_ref()).await?;

    Ok(Json(summary))
}
