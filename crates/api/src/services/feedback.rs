//! Feedback ledger: append-only ratings tied to accepted session requests.

use educonnect_core::{
    errors::{EduError, EduResult},
    models::{
        feedback::{Feedback, FeedbackParty, FeedbackView, NewFeedback, Rating, SubmitFeedbackRequest},
        session::SessionStatus,
    },
};
use educonnect_db::Store;
use tracing::info;
use uuid::Uuid;

use crate::middleware::auth::{Caller, Operation, authorize};
use crate::services::session::users_by_id;

pub async fn submit(
    store: &dyn Store,
    caller: &Caller,
    session_request_id: Uuid,
    payload: SubmitFeedbackRequest,
) -> EduResult<Feedback> {
    authorize(Some(caller.role), Operation::SubmitFeedback)?;
    let rating = Rating::try_from(&payload.rating)?;

    if payload.from != caller.id {
        return Err(EduError::Forbidden);
    }

    let request = store
        .find_session_request(session_request_id)
        .await?
        .ok_or_else(|| {
            EduError::NotFound(format!("Session request with ID {session_request_id} not found"))
        })?;

    if request.status != SessionStatus::Accepted {
        return Err(EduError::Conflict(format!(
            "feedback requires an accepted session request, this one is {}",
            request.status
        )));
    }
    if request.counterpart_of(payload.from) != Some(payload.to) {
        return Err(EduError::Validation(
            "feedback must go from one participant of the session to the other".to_string(),
        ));
    }

    let comments = payload.comments.filter(|c| !c.trim().is_empty());
    let feedback = store
        .insert_feedback(NewFeedback {
            session_request_id,
            reviewer_id: payload.from,
            reviewee_id: payload.to,
            rating,
            comments,
        })
        .await?;

    info!(
        feedback = %feedback.id,
        session_request = %session_request_id,
        rating = feedback.rating.value(),
        "Feedback recorded"
    );
    Ok(feedback)
}

pub async fn list_all(store: &dyn Store, caller: Option<&Caller>) -> EduResult<Vec<FeedbackView>> {
    authorize(caller.map(|c| c.role), Operation::ListAllFeedback)?;

    let ledger = store.list_feedback().await?;
    let ids: Vec<Uuid> = ledger
        .iter()
        .flat_map(|entry| [entry.reviewer_id, entry.reviewee_id])
        .collect();
    let users = users_by_id(store, &ids).await?;

    let party = |id: Uuid| {
        let user = users.get(&id);
        FeedbackParty {
            id,
            name: user.map(|u| u.name.clone()),
            role: user.map(|u| u.role()),
        }
    };

    Ok(ledger
        .into_iter()
        .map(|entry| FeedbackView {
            id: entry.id,
            session_request_id: entry.session_request_id,
            from: party(entry.reviewer_id),
            to: party(entry.reviewee_id),
            rating: entry.rating,
            comments: entry.comments,
            created_at: entry.created_at,
        })
        .collect())
}
