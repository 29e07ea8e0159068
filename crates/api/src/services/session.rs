//! Session request engine.
//!
//! A request is created `pending` by a student and resolved at most once by
//! the tutor it is addressed to. Resolution goes through the store's
//! conditional update, so a late or duplicate response can never overwrite
//! an already-resolved request.

use std::collections::HashMap;

use educonnect_core::{
    errors::{EduError, EduResult, Participant},
    models::{
        session::{
            NewSessionRequest, ParticipantSessionView, SessionDetail, SessionFilter,
            SessionRequest, SessionStatus, ListSessionRequestsQuery,
        },
        user::{Role, User},
    },
};
use educonnect_db::Store;
use tracing::{info, warn};
use uuid::Uuid;

use crate::middleware::auth::{Caller, Operation, authorize};

pub async fn create(
    store: &dyn Store,
    caller: &Caller,
    request: NewSessionRequest,
) -> EduResult<SessionRequest> {
    authorize(Some(caller.role), Operation::CreateSessionRequest)?;
    if !caller.is_admin() && caller.id != request.student_id {
        warn!(caller = %caller.id, "Rejected session request on behalf of another student");
        return Err(EduError::Forbidden);
    }
    request.validate()?;

    let student = store.find_user(request.student_id).await?;
    if !student.is_some_and(|user| user.has_role(Role::Student)) {
        return Err(EduError::InvalidParticipant(Participant::Student));
    }
    let tutor = store.find_user(request.tutor_id).await?;
    if !tutor.is_some_and(|user| user.has_role(Role::Tutor)) {
        return Err(EduError::InvalidParticipant(Participant::Tutor));
    }

    let created = store.insert_session_request(request).await?;
    info!(
        session_request = %created.id,
        student = %created.student_id,
        tutor = %created.tutor_id,
        "Session request created"
    );
    Ok(created)
}

/// Resolves a pending request to `accepted` or `declined`.
///
/// A request that does not exist and a request addressed to another tutor
/// are both reported as `Forbidden`.
pub async fn respond(
    store: &dyn Store,
    caller: &Caller,
    id: Uuid,
    status: &str,
) -> EduResult<SessionRequest> {
    authorize(Some(caller.role), Operation::RespondToSessionRequest)?;
    let target = SessionStatus::parse_resolution(status)?;

    let current = match store.find_session_request(id).await? {
        Some(request) if request.tutor_id == caller.id => request,
        _ => {
            warn!(caller = %caller.id, session_request = %id, "Rejected response from non-addressee");
            return Err(EduError::Forbidden);
        }
    };
    current.status.transition(target)?;

    match store
        .resolve_session_request(id, SessionStatus::Pending, target)
        .await?
    {
        Some(updated) => {
            info!(session_request = %id, status = %updated.status, "Session request resolved");
            Ok(updated)
        }
        None => {
            warn!(session_request = %id, "Session request was resolved concurrently");
            Err(EduError::Conflict(
                "session request has already been resolved".to_string(),
            ))
        }
    }
}

pub async fn fetch(store: &dyn Store, caller: &Caller, id: Uuid) -> EduResult<SessionDetail> {
    authorize(Some(caller.role), Operation::ViewSessionRequest)?;

    let request = store
        .find_session_request(id)
        .await?
        .ok_or_else(|| EduError::NotFound(format!("Session request with ID {id} not found")))?;
    let users = users_by_id(store, &[request.student_id, request.tutor_id]).await?;

    Ok(detail(request, &users))
}

/// Lists one participant's requests, each carrying the other side's name.
///
/// `role` and `userId` default to the caller; non-admins may only list their
/// own requests.
pub async fn list_for_participant(
    store: &dyn Store,
    caller: &Caller,
    query: ListSessionRequestsQuery,
) -> EduResult<Vec<ParticipantSessionView>> {
    authorize(Some(caller.role), Operation::ListOwnSessionRequests)?;

    let role = match query.role.as_deref() {
        Some(role) => role.parse::<Role>()?,
        None => caller.role,
    };
    let user_id = query.user_id.unwrap_or(caller.id);
    let filter = SessionFilter::for_participant(role, user_id)?;

    if !caller.is_admin() && (user_id != caller.id || role != caller.role) {
        return Err(EduError::Forbidden);
    }

    let requests = store.list_session_requests(filter).await?;
    let counterpart_ids: Vec<Uuid> = requests
        .iter()
        .filter_map(|request| request.counterpart_of(user_id))
        .collect();
    let users = users_by_id(store, &counterpart_ids).await?;

    Ok(requests
        .into_iter()
        .map(|request| {
            let counterpart_name = request
                .counterpart_of(user_id)
                .and_then(|id| users.get(&id))
                .map(|user| user.name.clone());
            ParticipantSessionView {
                request,
                counterpart_name,
            }
        })
        .collect())
}

pub async fn list_all(store: &dyn Store, caller: Option<&Caller>) -> EduResult<Vec<SessionDetail>> {
    authorize(caller.map(|c| c.role), Operation::ListAllSessionRequests)?;

    let requests = store.list_session_requests(SessionFilter::All).await?;
    let ids: Vec<Uuid> = requests
        .iter()
        .flat_map(|request| [request.student_id, request.tutor_id])
        .collect();
    let users = users_by_id(store, &ids).await?;

    Ok(requests
        .into_iter()
        .map(|request| detail(request, &users))
        .collect())
}

pub(crate) async fn users_by_id(store: &dyn Store, ids: &[Uuid]) -> EduResult<HashMap<Uuid, User>> {
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    Ok(store
        .find_users(&unique)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect())
}

fn detail(request: SessionRequest, users: &HashMap<Uuid, User>) -> SessionDetail {
    let name_of = |id: Uuid| users.get(&id).map(|user| user.name.clone());
    SessionDetail {
        student_name: name_of(request.student_id),
        tutor_name: name_of(request.tutor_id),
        request,
    }
}
