use chrono::{DateTime, Utc};
use educonnect_core::models::{
    feedback::{Feedback, Rating},
    session::SessionRequest,
    user::{AvailabilitySlot, Role, RoleProfile, StudentProfile, TutorProfile, User, VerificationStatus},
};
use eyre::{eyre, Report, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub subjects: Option<Vec<String>>,
    pub location: Option<String>,
    pub availability: Option<Json<Vec<AvailabilitySlot>>>,
    pub verification_document: Option<String>,
    pub verification_status: Option<String>,
    pub learning_goals: Option<String>,
    pub preferred_subjects: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = Report;

    fn try_from(row: DbUser) -> Result<Self> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| eyre!("User {} has unknown role '{}'", row.id, row.role))?;

        let profile = match role {
            Role::Student => RoleProfile::Student(StudentProfile {
                learning_goals: row.learning_goals,
                preferred_subjects: row.preferred_subjects.unwrap_or_default().into_iter().collect(),
            }),
            Role::Tutor => {
                // Rows written before verification existed carry no status.
                let verification_status = match row.verification_status.as_deref() {
                    Some(status) => status
                        .parse()
                        .map_err(|_| eyre!("User {} has unknown verification status '{}'", row.id, status))?,
                    None => VerificationStatus::Pending,
                };
                RoleProfile::Tutor(TutorProfile {
                    subjects: row.subjects.unwrap_or_default().into_iter().collect(),
                    location: row.location,
                    availability: row.availability.map(|json| json.0).unwrap_or_default(),
                    verification_document: row.verification_document,
                    verification_status,
                })
            }
            Role::Admin => RoleProfile::Admin,
        };

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Column values of the role-specific part of a user row. Columns belonging
/// to other roles are `None`.
#[derive(Debug, Clone, Default)]
pub struct ProfileColumns {
    pub subjects: Option<Vec<String>>,
    pub location: Option<String>,
    pub availability: Option<Json<Vec<AvailabilitySlot>>>,
    pub verification_document: Option<String>,
    pub verification_status: Option<&'static str>,
    pub learning_goals: Option<String>,
    pub preferred_subjects: Option<Vec<String>>,
}

impl From<&RoleProfile> for ProfileColumns {
    fn from(profile: &RoleProfile) -> Self {
        match profile {
            RoleProfile::Student(student) => ProfileColumns {
                learning_goals: student.learning_goals.clone(),
                preferred_subjects: Some(student.preferred_subjects.iter().cloned().collect()),
                ..ProfileColumns::default()
            },
            RoleProfile::Tutor(tutor) => ProfileColumns {
                subjects: Some(tutor.subjects.iter().cloned().collect()),
                location: tutor.location.clone(),
                availability: Some(Json(tutor.availability.clone())),
                verification_document: tutor.verification_document.clone(),
                verification_status: Some(tutor.verification_status.as_str()),
                ..ProfileColumns::default()
            },
            RoleProfile::Admin => ProfileColumns::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSessionRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub subject: String,
    pub requested_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbSessionRequest> for SessionRequest {
    type Error = Report;

    fn try_from(row: DbSessionRequest) -> Result<Self> {
        let status = row
            .status
            .parse()
            .map_err(|_| eyre!("Session request {} has unknown status '{}'", row.id, row.status))?;

        Ok(SessionRequest {
            id: row.id,
            student_id: row.student_id,
            tutor_id: row.tutor_id,
            subject: row.subject,
            requested_time: row.requested_time,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFeedback {
    pub id: Uuid,
    pub session_request_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: i16,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbFeedback> for Feedback {
    type Error = Report;

    fn try_from(row: DbFeedback) -> Result<Self> {
        let rating = Rating::new(i64::from(row.rating))
            .map_err(|e| eyre!("Feedback {} has invalid rating: {}", row.id, e))?;

        Ok(Feedback {
            id: row.id,
            session_request_id: row.session_request_id,
            reviewer_id: row.reviewer_id,
            reviewee_id: row.reviewee_id,
            rating,
            comments: row.comments,
            created_at: row.created_at,
        })
    }
}
