//! In-process store for tests and `memory://` deployments.
//!
//! Records live in append-only arenas indexed by id. Every mutation happens
//! under a single write lock, which is what makes the conditional status
//! update atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use educonnect_core::models::{
    directory::DirectoryQuery,
    feedback::{Feedback, NewFeedback},
    session::{NewSessionRequest, SessionFilter, SessionRequest, SessionStatus},
    user::{NewUser, Role, RoleProfile, User, VerificationStatus},
};
use eyre::Result;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::Store;

#[derive(Debug, Default)]
struct Arena {
    users: Vec<User>,
    user_index: HashMap<Uuid, usize>,
    session_requests: Vec<SessionRequest>,
    session_index: HashMap<Uuid, usize>,
    feedback: Vec<Feedback>,
}

impl Arena {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.user_index.get(&id).map(|&slot| &self.users[slot])
    }

    fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.user_index.get(&id).map(|&slot| &mut self.users[slot])
    }

    fn session_request_mut(&mut self, id: Uuid) -> Option<&mut SessionRequest> {
        self.session_index
            .get(&id)
            .map(|&slot| &mut self.session_requests[slot])
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    arena: RwLock<Arena>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<Option<User>> {
        let mut arena = self.arena.write().await;
        if arena.users.iter().any(|existing| existing.email == user.email) {
            return Ok(None);
        }

        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            profile: user.profile,
            created_at: now,
            updated_at: now,
        };
        let slot = arena.users.len();
        arena.user_index.insert(record.id, slot);
        arena.users.push(record.clone());
        Ok(Some(record))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.arena.read().await.user(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let arena = self.arena.read().await;
        Ok(arena.users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let arena = self.arena.read().await;
        Ok(ids.iter().filter_map(|id| arena.user(*id)).cloned().collect())
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>> {
        let arena = self.arena.read().await;
        Ok(arena
            .users
            .iter()
            .filter(|user| role.is_none_or(|role| user.has_role(role)))
            .cloned()
            .collect())
    }

    async fn search_users(&self, query: &DirectoryQuery) -> Result<Vec<User>> {
        let arena = self.arena.read().await;
        Ok(arena
            .users
            .iter()
            .filter(|user| query.matches(user))
            .cloned()
            .collect())
    }

    async fn update_user(&self, user: &User) -> Result<Option<User>> {
        let mut arena = self.arena.write().await;
        let Some(existing) = arena.user_mut(user.id) else {
            return Ok(None);
        };
        if existing.role() != user.role() {
            return Ok(None);
        }

        let mut profile = user.profile.clone();
        if let (RoleProfile::Tutor(next), RoleProfile::Tutor(current)) = (&mut profile, &existing.profile) {
            next.verification_status = current.verification_status;
        }
        existing.name = user.name.clone();
        existing.profile = profile;
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn set_verification_status(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> Result<Option<User>> {
        let mut arena = self.arena.write().await;
        let Some(user) = arena.user_mut(id) else {
            return Ok(None);
        };
        let RoleProfile::Tutor(tutor) = &mut user.profile else {
            return Ok(None);
        };
        tutor.verification_status = status;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn insert_session_request(&self, request: NewSessionRequest) -> Result<SessionRequest> {
        let mut arena = self.arena.write().await;
        let now = Utc::now();
        let record = SessionRequest {
            id: Uuid::new_v4(),
            student_id: request.student_id,
            tutor_id: request.tutor_id,
            subject: request.subject,
            requested_time: request.requested_time,
            status: SessionStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let slot = arena.session_requests.len();
        arena.session_index.insert(record.id, slot);
        arena.session_requests.push(record.clone());
        Ok(record)
    }

    async fn find_session_request(&self, id: Uuid) -> Result<Option<SessionRequest>> {
        let arena = self.arena.read().await;
        Ok(arena
            .session_index
            .get(&id)
            .map(|&slot| arena.session_requests[slot].clone()))
    }

    async fn list_session_requests(&self, filter: SessionFilter) -> Result<Vec<SessionRequest>> {
        let arena = self.arena.read().await;
        Ok(arena
            .session_requests
            .iter()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect())
    }

    async fn resolve_session_request(
        &self,
        id: Uuid,
        expected: SessionStatus,
        status: SessionStatus,
    ) -> Result<Option<SessionRequest>> {
        let mut arena = self.arena.write().await;
        let Some(request) = arena.session_request_mut(id) else {
            return Ok(None);
        };
        if request.status != expected {
            return Ok(None);
        }
        request.status = status;
        request.updated_at = Utc::now();
        Ok(Some(request.clone()))
    }

    async fn insert_feedback(&self, feedback: NewFeedback) -> Result<Feedback> {
        let mut arena = self.arena.write().await;
        let record = Feedback {
            id: Uuid::new_v4(),
            session_request_id: feedback.session_request_id,
            reviewer_id: feedback.reviewer_id,
            reviewee_id: feedback.reviewee_id,
            rating: feedback.rating,
            comments: feedback.comments,
            created_at: Utc::now(),
        };
        arena.feedback.push(record.clone());
        Ok(record)
    }

    async fn list_feedback(&self) -> Result<Vec<Feedback>> {
        Ok(self.arena.read().await.feedback.clone())
    }
}
