//! Admin console: user listings, tutor verification and rollups.

use educonnect_core::{
    errors::{EduError, EduResult},
    models::{
        admin::AdminSummary,
        session::SessionFilter,
        user::{Role, UserProfile, VerificationStatus},
    },
};
use educonnect_db::Store;
use tracing::info;
use uuid::Uuid;

use crate::middleware::auth::{Caller, Operation, authorize};

pub async fn list_users(
    store: &dyn Store,
    caller: Option<&Caller>,
    role: Option<Role>,
) -> EduResult<Vec<UserProfile>> {
    authorize(caller.map(|c| c.role), Operation::ListUsers)?;

    Ok(store
        .list_users(role)
        .await?
        .into_iter()
        .map(UserProfile::from)
        .collect())
}

/// Sets a tutor's verification status to `verified` or `rejected`.
pub async fn verify_tutor(
    store: &dyn Store,
    caller: Option<&Caller>,
    id: Uuid,
    decision: &str,
) -> EduResult<UserProfile> {
    authorize(caller.map(|c| c.role), Operation::VerifyTutor)?;
    let status = VerificationStatus::parse_decision(decision)?;

    let tutor = store
        .set_verification_status(id, status)
        .await?
        .ok_or_else(|| EduError::NotFound(format!("Tutor with ID {id} not found")))?;

    info!(tutor = %id, status = %status, "Tutor verification updated");
    Ok(UserProfile::from(tutor))
}

pub async fn summary(store: &dyn Store, caller: Option<&Caller>) -> EduResult<AdminSummary> {
    authorize(caller.map(|c| c.role), Operation::ViewAdminSummary)?;

    let users = store.list_users(None).await?;
    let requests = store.list_session_requests(SessionFilter::All).await?;
    let feedback = store.list_feedback().await?;

    Ok(AdminSummary::collect(&users, &requests, &feedback))
}
