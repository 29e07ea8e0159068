use serde::{Deserialize, Serialize};

use crate::models::feedback::{Feedback, FeedbackView};
use crate::models::session::{SessionDetail, SessionRequest, SessionStatus};
use crate::models::user::{RoleProfile, User, UserProfile, VerificationStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTutorRequest {
    pub verification_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTutorResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersQuery {
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorsResponse {
    pub tutors: Vec<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentsResponse {
    pub students: Vec<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionRequestsResponse {
    pub session_requests: Vec<SessionDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminFeedbackResponse {
    pub feedbacks: Vec<FeedbackView>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub students: usize,
    pub tutors: usize,
    pub admins: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCounts {
    pub pending: usize,
    pub verified: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub accepted: usize,
    pub declined: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total: usize,
    pub average_rating: Option<f64>,
}

/// Read-only rollup for the admin console.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub users: RoleCounts,
    pub tutor_verification: VerificationCounts,
    pub session_requests: StatusCounts,
    pub feedback: FeedbackStats,
}

impl AdminSummary {
    pub fn collect(users: &[User], requests: &[SessionRequest], feedback: &[Feedback]) -> Self {
        let mut summary = AdminSummary::default();

        for user in users {
            match &user.profile {
                RoleProfile::Student(_) => summary.users.students += 1,
                RoleProfile::Admin => summary.users.admins += 1,
                RoleProfile::Tutor(tutor) => {
                    summary.users.tutors += 1;
                    match tutor.verification_status {
                        VerificationStatus::Pending => summary.tutor_verification.pending += 1,
                        VerificationStatus::Verified => summary.tutor_verification.verified += 1,
                        VerificationStatus::Rejected => summary.tutor_verification.rejected += 1,
                    }
                }
            }
        }

        for request in requests {
            match request.status {
                SessionStatus::Pending => summary.session_requests.pending += 1,
                SessionStatus::Accepted => summary.session_requests.accepted += 1,
                SessionStatus::Declined => summary.session_requests.declined += 1,
            }
        }

        summary.feedback.total = feedback.len();
        if !feedback.is_empty() {
            let sum: u32 = feedback.iter().map(|f| u32::from(f.rating.value())).sum();
            summary.feedback.average_rating = Some(f64::from(sum) / feedback.len() as f64);
        }

        summary
    }
}
