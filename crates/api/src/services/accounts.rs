//! Registration, login and profile maintenance.

use educonnect_core::{
    errors::{EduError, EduResult},
    models::user::{
        LoginRequest, NewUser, RegisterRequest, Role, UpdateProfileRequest, User, UserProfile,
    },
};
use educonnect_db::Store;
use tracing::{info, warn};
use uuid::Uuid;

use crate::middleware::auth::{self, Caller, Operation, authorize};

const LOGIN_FAILED: &str = "Invalid email or password";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registers a new account. Admin accounts additionally need the configured
/// registration code; without one configured they cannot be self-registered.
pub async fn register(
    store: &dyn Store,
    admin_registration_code: Option<&str>,
    request: RegisterRequest,
) -> EduResult<User> {
    let profile = request.validated_profile()?;

    if profile.role() == Role::Admin {
        let authorized = matches!(
            (admin_registration_code, request.admin_code.as_deref()),
            (Some(expected), Some(given)) if expected == given
        );
        if !authorized {
            warn!("Rejected admin registration without a valid code");
            return Err(EduError::Forbidden);
        }
    }

    let email = normalize_email(&request.email);
    if store.find_user_by_email(&email).await?.is_some() {
        return Err(EduError::Conflict("Email already registered".to_string()));
    }

    let password_hash = auth::hash_password(&request.password)?;
    let user = store
        .insert_user(NewUser {
            name: request.name.trim().to_string(),
            email,
            password_hash,
            profile,
        })
        .await?
        .ok_or_else(|| EduError::Conflict("Email already registered".to_string()))?;

    info!(user = %user.id, role = %user.role(), "User registered");
    Ok(user)
}

/// Checks credentials. Unknown email and wrong password fail identically,
/// and both run one password verification.
pub async fn login(store: &dyn Store, request: LoginRequest) -> EduResult<User> {
    let found = store
        .find_user_by_email(&normalize_email(&request.email))
        .await?;

    let Some(user) = found else {
        auth::verify_password(&request.password, auth::dummy_password_hash()?)?;
        return Err(EduError::Authentication(LOGIN_FAILED.to_string()));
    };

    if !auth::verify_password(&request.password, &user.password_hash)? {
        return Err(EduError::Authentication(LOGIN_FAILED.to_string()));
    }

    info!(user = %user.id, "User logged in");
    Ok(user)
}

pub async fn profile(store: &dyn Store, caller: &Caller, id: Uuid) -> EduResult<UserProfile> {
    authorize(Some(caller.role), Operation::ViewProfile)?;

    store
        .find_user(id)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| EduError::NotFound(format!("User with ID {id} not found")))
}

/// Updates the caller's own profile.
pub async fn update_profile(
    store: &dyn Store,
    caller: &Caller,
    id: Uuid,
    request: UpdateProfileRequest,
) -> EduResult<UserProfile> {
    authorize(Some(caller.role), Operation::UpdateProfile)?;
    if caller.id != id {
        return Err(EduError::Forbidden);
    }

    let mut user = store
        .find_user(id)
        .await?
        .ok_or_else(|| EduError::NotFound(format!("User with ID {id} not found")))?;
    request.apply(&mut user)?;

    let updated = store
        .update_user(&user)
        .await?
        .ok_or_else(|| EduError::NotFound(format!("User with ID {id} not found")))?;

    info!(user = %id, "Profile updated");
    Ok(UserProfile::from(updated))
}
