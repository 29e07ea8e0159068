//! # Authentication and Authorization Module
//!
//! Credential hashing, caller identification and the authorization guard.
//!
//! The caller is identified by the `X-User-Id` header. The role used for any
//! authorization decision is always the one stored for that user; a role
//! supplied in a request body or query string is never trusted.

use std::sync::{Arc, OnceLock};

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use educonnect_core::{
    errors::{EduError, EduResult},
    models::user::Role,
};
use eyre::Result;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Header carrying the authenticated user's id.
pub const CALLER_HEADER: &str = "x-user-id";

/// Hashes a password using the Argon2 algorithm
///
/// Uses a fresh random salt and default Argon2 parameters, and returns the
/// hash in PHC string format.
///
/// # Example
///
/// ```rust
/// use educonnect_api::middleware::auth::hash_password;
///
/// let hashed = hash_password("user_password").unwrap();
/// assert!(hashed.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a password against a stored PHC hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Invalid password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

static DUMMY_PASSWORD_HASH: OnceLock<String> = OnceLock::new();

/// A hash of no real account's password, with the same parameters as stored
/// hashes. Verifying against it costs as much as a real check.
pub fn dummy_password_hash() -> Result<&'static str> {
    if let Some(hash) = DUMMY_PASSWORD_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password("educonnect-unmatched-login")?;
    Ok(DUMMY_PASSWORD_HASH.get_or_init(|| hash))
}

/// Every operation the API exposes, as seen by the authorization guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListUsers,
    VerifyTutor,
    ListAllSessionRequests,
    ListAllFeedback,
    ViewAdminSummary,
    CreateSessionRequest,
    RespondToSessionRequest,
    ViewSessionRequest,
    ListOwnSessionRequests,
    SubmitFeedback,
    SearchDirectory,
    ViewProfile,
    UpdateProfile,
}

impl Operation {
    pub fn is_admin_only(self) -> bool {
        matches!(
            self,
            Operation::ListUsers
                | Operation::VerifyTutor
                | Operation::ListAllSessionRequests
                | Operation::ListAllFeedback
                | Operation::ViewAdminSummary
        )
    }
}

/// Authorization guard.
///
/// Admin-only operations require exactly the `admin` role; anything else,
/// including an unidentified caller, is `Forbidden`. Every other operation is
/// open to any identified caller, with finer rules left to the services.
pub fn authorize(role: Option<Role>, operation: Operation) -> EduResult<()> {
    match (operation.is_admin_only(), role) {
        (true, Some(Role::Admin)) => Ok(()),
        (true, _) => Err(EduError::Forbidden),
        (false, Some(_)) => Ok(()),
        (false, None) => Err(EduError::Authentication(
            "authentication required".to_string(),
        )),
    }
}

/// The identified user on whose behalf a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn caller_id(headers: &HeaderMap) -> EduResult<Uuid> {
    let value = headers
        .get(CALLER_HEADER)
        .ok_or_else(|| EduError::Authentication("missing caller identity".to_string()))?;

    value
        .to_str()
        .ok()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .ok_or_else(|| EduError::Authentication("malformed caller identity".to_string()))
}

/// Resolves the caller against the identity store.
pub async fn identify(state: &ApiState, headers: &HeaderMap) -> EduResult<Caller> {
    let id = caller_id(headers)?;
    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| EduError::Authentication("unknown caller".to_string()))?;

    Ok(Caller {
        id: user.id,
        role: user.role(),
    })
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(identify(state, &parts.headers).await?)
    }
}

/// Caller for admin routes. An unidentified caller is `None` so that the
/// guard can deny it with the same `Forbidden` as a non-admin. Storage faults
/// still fail the request.
#[derive(Debug, Clone, Copy)]
pub struct MaybeCaller(pub Option<Caller>);

impl MaybeCaller {
    pub fn role(&self) -> Option<Role> {
        self.0.map(|caller| caller.role)
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for MaybeCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        match identify(state, &parts.headers).await {
            Ok(caller) => Ok(MaybeCaller(Some(caller))),
            Err(err) if err.is_server_fault() => Err(AppError(err)),
            Err(_) => Ok(MaybeCaller(None)),
        }
    }
}
