use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EduError, EduResult};
use crate::models::user::Role;

/// Lifecycle state of a session request.
///
/// `Pending` is the only initial state. `Accepted` and `Declined` are
/// terminal: once a request leaves `Pending` it never changes again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Accepted => "accepted",
            SessionStatus::Declined => "declined",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Pending)
    }

    /// Parses a tutor's response. Only the two terminal states are accepted.
    pub fn parse_resolution(value: &str) -> EduResult<Self> {
        match value {
            "accepted" => Ok(SessionStatus::Accepted),
            "declined" => Ok(SessionStatus::Declined),
            other => Err(EduError::InvalidStatus(format!(
                "'{other}' is not a valid response (expected accepted or declined)"
            ))),
        }
    }

    /// Checks that `self -> to` is a defined transition.
    pub fn transition(self, to: SessionStatus) -> EduResult<SessionStatus> {
        if self.is_terminal() {
            return Err(EduError::Conflict(format!(
                "session request has already been {self}"
            )));
        }
        if !to.is_terminal() {
            return Err(EduError::InvalidStatus(to.to_string()));
        }
        Ok(to)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = EduError;

    fn from_str(s: &str) -> EduResult<Self> {
        match s {
            "pending" => Ok(SessionStatus::Pending),
            "accepted" => Ok(SessionStatus::Accepted),
            "declined" => Ok(SessionStatus::Declined),
            other => Err(EduError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub subject: String,
    pub requested_time: DateTime<Utc>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRequest {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.student_id == user_id || self.tutor_id == user_id
    }

    /// The other participant, if `user_id` is one of the two.
    pub fn counterpart_of(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.student_id {
            Some(self.tutor_id)
        } else if user_id == self.tutor_id {
            Some(self.student_id)
        } else {
            None
        }
    }
}

/// Body of a create call and insert payload for the store. The store always
/// inserts it as `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionRequest {
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub subject: String,
    pub requested_time: DateTime<Utc>,
}

impl NewSessionRequest {
    pub fn validate(&self) -> EduResult<()> {
        if self.subject.trim().is_empty() {
            return Err(EduError::Validation("subject is required".to_string()));
        }
        Ok(())
    }
}

/// Selects session requests by participant side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFilter {
    All,
    Student(Uuid),
    Tutor(Uuid),
}

impl SessionFilter {
    /// Builds a participant filter. Only `student` and `tutor` name a side.
    pub fn for_participant(role: Role, user_id: Uuid) -> EduResult<Self> {
        match role {
            Role::Student => Ok(SessionFilter::Student(user_id)),
            Role::Tutor => Ok(SessionFilter::Tutor(user_id)),
            Role::Admin => Err(EduError::InvalidRole(role.to_string())),
        }
    }

    pub fn matches(&self, request: &SessionRequest) -> bool {
        match self {
            SessionFilter::All => true,
            SessionFilter::Student(id) => request.student_id == *id,
            SessionFilter::Tutor(id) => request.tutor_id == *id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub message: String,
    pub session_request_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondResponse {
    pub message: String,
    pub session_request: SessionRequest,
}

/// A session request with both participant names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    #[serde(flatten)]
    pub request: SessionRequest,
    pub student_name: Option<String>,
    pub tutor_name: Option<String>,
}

/// A session request as seen by one participant: only the other side's
/// name is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSessionView {
    #[serde(flatten)]
    pub request: SessionRequest,
    pub counterpart_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionRequestsQuery {
    pub role: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSessionResponse {
    pub session: SessionDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSessionRequestsResponse {
    pub requests: Vec<ParticipantSessionView>,
}
