//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the EduConnect API.
//! It maps domain-specific errors to appropriate HTTP status codes and JSON
//! error responses of the form `{"message": "..."}`.
//!
//! Storage and internal faults are logged in full and reported to the caller
//! with a generic message only.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use educonnect_core::errors::EduError;
use serde_json::json;

/// Message shown to callers for 5xx responses.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `EduError` instances and implements
/// `IntoResponse` to convert them into HTTP responses.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use educonnect_api::middleware::error_handling::AppError;
/// use educonnect_core::errors::EduError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(EduError::NotFound("Session request not found".into())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub EduError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            err if err.is_validation() => StatusCode::BAD_REQUEST,
            EduError::NotFound(_) => StatusCode::NOT_FOUND,
            EduError::Authentication(_) => StatusCode::UNAUTHORIZED,
            EduError::Forbidden => StatusCode::FORBIDDEN,
            EduError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if self.0.is_server_fault() {
            tracing::error!(error = ?self.0, "Request failed with a server fault");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<EduError> for AppError {
    fn from(err: EduError) -> Self {
        AppError(err)
    }
}

/// Storage failures surfaced through `eyre` are treated as database faults.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(EduError::Database(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(EduError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(EduError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(EduError::Validation(rejection.body_text()))
    }
}

/// `axum::Json` whose rejections use the API error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` whose rejections use the API error shape.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `axum::extract::Query` whose rejections use the API error shape.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Maps an EduError to an HTTP response
pub fn map_error(err: EduError) -> Response {
    AppError(err).into_response()
}
