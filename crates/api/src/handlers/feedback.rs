use axum::{Json, extract::State, http::StatusCode};
use educonnect_core::models::feedback::{SubmitFeedbackRequest, SubmitFeedbackResponse};
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
pub async fn submit_feedback(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiPath(session_request_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<SubmitFeedbackResponse>), AppError> {
    let feedback =
        services::feedback::submit(state.store.as_ref(), &caller, session_request_id, payload)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitFeedbackResponse {
            message: "Feedback submitted successfully".to_string(),
            feedback,
        }),
    ))
}
