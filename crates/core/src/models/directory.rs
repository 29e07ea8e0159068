use serde::{Deserialize, Serialize};

use crate::errors::{EduError, EduResult};
use crate::models::user::{Role, User, UserProfile};

/// Role-scoped directory lookup.
///
/// Students search tutors by name or subject, tutors search students by name.
/// The text is matched as a case-insensitive literal substring of any length;
/// empty text matches every record of the target role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryQuery {
    target: Role,
    text: String,
    needle: String,
    match_subjects: bool,
}

impl DirectoryQuery {
    pub fn for_caller(caller_role: Role, text: &str) -> EduResult<Self> {
        let (target, match_subjects) = match caller_role {
            Role::Student => (Role::Tutor, true),
            Role::Tutor => (Role::Student, false),
            Role::Admin => return Err(EduError::InvalidRole(caller_role.to_string())),
        };

        Ok(Self {
            target,
            text: text.to_string(),
            needle: text.to_lowercase(),
            match_subjects,
        })
    }

    pub fn target(&self) -> Role {
        self.target
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn match_subjects(&self) -> bool {
        self.match_subjects
    }

    fn hits(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }

    pub fn matches(&self, user: &User) -> bool {
        if user.role() != self.target {
            return false;
        }
        if self.hits(&user.name) {
            return true;
        }
        self.match_subjects
            && user
                .profile
                .as_tutor()
                .is_some_and(|tutor| tutor.subjects.iter().any(|s| self.hits(s)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<UserProfile>,
}
