use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{EduError, EduResult};
use crate::models::user::Role;

/// Integer rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> EduResult<Self> {
        if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            return Err(EduError::InvalidRating(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Rating(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = EduError;

    fn try_from(value: u8) -> EduResult<Self> {
        Rating::new(i64::from(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Raw JSON input is checked here so that fractional or non-numeric ratings
/// surface as `InvalidRating` rather than a body parse failure.
impl TryFrom<&Value> for Rating {
    type Error = EduError;

    fn try_from(value: &Value) -> EduResult<Self> {
        match value {
            Value::Number(number) => {
                if let Some(whole) = number.as_i64() {
                    return Rating::new(whole);
                }
                match number.as_f64() {
                    Some(float) if float.fract() == 0.0 && float.abs() <= f64::from(u8::MAX) => {
                        Rating::new(float as i64)
                    }
                    _ => Err(EduError::InvalidRating(format!(
                        "rating must be a whole number, got {number}"
                    ))),
                }
            }
            Value::Null => Err(EduError::InvalidRating("rating is required".to_string())),
            other => Err(EduError::InvalidRating(format!(
                "rating must be a number, got {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub session_request_id: Uuid,
    #[serde(rename = "from")]
    pub reviewer_id: Uuid,
    #[serde(rename = "to")]
    pub reviewee_id: Uuid,
    pub rating: Rating,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the ledger. The store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub session_request_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: Rating,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub rating: Value,
    pub comments: Option<String>,
    pub from: Uuid,
    pub to: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFeedbackResponse {
    pub message: String,
    pub feedback: Feedback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackParty {
    pub id: Uuid,
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// Feedback with reviewer and reviewee resolved, as listed to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub id: Uuid,
    pub session_request_id: Uuid,
    pub from: FeedbackParty,
    pub to: FeedbackParty,
    pub rating: Rating,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}
