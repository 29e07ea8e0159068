use axum::{Json, extract::State, http::StatusCode};
use educonnect_core::models::user::{
    LoginRequest, LoginResponse, LoginUser, ProfileResponse, RegisterRequest, RegisterResponse,
    UpdateProfileRequest, UpdateProfileResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::Caller,
        error_handling::{ApiJson, ApiPath, AppError},
    },
    services,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user = services::accounts::register(
        state.store.as_ref(),
        state.admin_registration_code.as_deref(),
        payload,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = services::accounts::login(state.store.as_ref(), payload).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: LoginUser {
            id: user.id,
            role: user.role(),
            name: user.name,
        },
    }))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = services::accounts::profile(state.store.as_ref(), &caller, id).await?;

    Ok(Json(ProfileResponse { user }))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    let user = services::accounts::update_profile(state.store.as_ref(), &caller, id, payload).await?;

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        user,
    }))
}
