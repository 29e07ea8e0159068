use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EduError, EduResult};

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 6;

/// Fixed role tag of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Tutor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Tutor => "tutor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = EduError;

    fn from_str(s: &str) -> EduResult<Self> {
        match s {
            "student" => Ok(Role::Student),
            "tutor" => Ok(Role::Tutor),
            "admin" => Ok(Role::Admin),
            other => Err(EduError::InvalidRole(other.to_string())),
        }
    }
}

/// Admin-assigned trust flag on tutor accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    /// Parses an admin decision. Only `verified` and `rejected` are decisions;
    /// `pending` is the initial state and cannot be assigned.
    pub fn parse_decision(value: &str) -> EduResult<Self> {
        match value {
            "verified" => Ok(VerificationStatus::Verified),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(EduError::InvalidStatus(format!(
                "'{other}' is not a verification decision (expected verified or rejected)"
            ))),
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = EduError;

    fn from_str(s: &str) -> EduResult<Self> {
        match s {
            "pending" => Ok(VerificationStatus::Pending),
            "verified" => Ok(VerificationStatus::Verified),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(EduError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub day: Weekday,
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub learning_goals: Option<String>,
    #[serde(default)]
    pub preferred_subjects: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorProfile {
    #[serde(default)]
    pub subjects: BTreeSet<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Vec<AvailabilitySlot>,
    #[serde(default)]
    pub verification_document: Option<String>,
    #[serde(default)]
    pub verification_status: VerificationStatus,
}

/// Role tag together with the attributes that only exist for that role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Student(StudentProfile),
    Tutor(TutorProfile),
    Admin,
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Student(_) => Role::Student,
            RoleProfile::Tutor(_) => Role::Tutor,
            RoleProfile::Admin => Role::Admin,
        }
    }

    pub fn as_tutor(&self) -> Option<&TutorProfile> {
        match self {
            RoleProfile::Tutor(tutor) => Some(tutor),
            _ => None,
        }
    }

    pub fn as_student(&self) -> Option<&StudentProfile> {
        match self {
            RoleProfile::Student(student) => Some(student),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(flatten)]
    pub profile: RoleProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role() == role
    }
}

/// Credential-free view of a user, safe to return to any caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: RoleProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            profile: user.profile,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Insert payload for the identity store. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile: RoleProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub subjects: Option<BTreeSet<String>>,
    pub location: Option<String>,
    pub availability: Option<Vec<AvailabilitySlot>>,
    pub verification_document: Option<String>,
    pub learning_goals: Option<String>,
    pub preferred_subjects: Option<BTreeSet<String>>,
    pub admin_code: Option<String>,
}

impl RegisterRequest {
    /// Checks the account fields and builds the role profile. Fields that
    /// belong to a different role than the requested one are dropped, and a
    /// new tutor always starts out `pending`.
    pub fn validated_profile(&self) -> EduResult<RoleProfile> {
        if self.name.trim().chars().count() < MIN_NAME_LEN {
            return Err(EduError::Validation(format!(
                "name must be at least {MIN_NAME_LEN} characters"
            )));
        }
        if !is_plausible_email(&self.email) {
            return Err(EduError::Validation("email is not valid".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(EduError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let profile = match self.role.parse::<Role>()? {
            Role::Student => RoleProfile::Student(StudentProfile {
                learning_goals: self.learning_goals.clone(),
                preferred_subjects: self.preferred_subjects.clone().unwrap_or_default(),
            }),
            Role::Tutor => RoleProfile::Tutor(TutorProfile {
                subjects: self.subjects.clone().unwrap_or_default(),
                location: self.location.clone(),
                availability: self.availability.clone().unwrap_or_default(),
                verification_document: self.verification_document.clone(),
                verification_status: VerificationStatus::Pending,
            }),
            Role::Admin => RoleProfile::Admin,
        };
        Ok(profile)
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUser {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: LoginUser,
}

/// Partial profile update. Absent fields keep their current value; fields of
/// another role are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub subjects: Option<BTreeSet<String>>,
    pub location: Option<String>,
    pub availability: Option<Vec<AvailabilitySlot>>,
    pub verification_document: Option<String>,
    pub learning_goals: Option<String>,
    pub preferred_subjects: Option<BTreeSet<String>>,
}

impl UpdateProfileRequest {
    pub fn apply(self, user: &mut User) -> EduResult<()> {
        if let Some(name) = self.name {
            if name.trim().chars().count() < MIN_NAME_LEN {
                return Err(EduError::Validation(format!(
                    "name must be at least {MIN_NAME_LEN} characters"
                )));
            }
            user.name = name;
        }

        match &mut user.profile {
            RoleProfile::Tutor(tutor) => {
                if let Some(subjects) = self.subjects {
                    tutor.subjects = subjects;
                }
                if let Some(location) = self.location {
                    tutor.location = Some(location);
                }
                if let Some(availability) = self.availability {
                    tutor.availability = availability;
                }
                if let Some(document) = self.verification_document {
                    tutor.verification_document = Some(document);
                }
            }
            RoleProfile::Student(student) => {
                if let Some(goals) = self.learning_goals {
                    student.learning_goals = Some(goals);
                }
                if let Some(subjects) = self.preferred_subjects {
                    student.preferred_subjects = subjects;
                }
            }
            RoleProfile::Admin => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub user: UserProfile,
}
