use async_trait::async_trait;
use educonnect_core::models::{
    directory::DirectoryQuery,
    feedback::{Feedback, NewFeedback},
    session::{NewSessionRequest, SessionFilter, SessionRequest, SessionStatus},
    user::{NewUser, Role, User, VerificationStatus},
};
use eyre::Result;
use mockall::automock;
use uuid::Uuid;

use crate::DbPool;
use crate::repositories::{feedback, session_request, user};

/// Persistence collaborator for users, session requests and feedback.
///
/// Implementations must make `resolve_session_request` atomic: the status is
/// only written when the stored status still equals `expected`.
#[automock]
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns `None` when the email is already registered.
    async fn insert_user(&self, user: NewUser) -> Result<Option<User>>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Unknown ids are skipped.
    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>>;

    async fn search_users(&self, query: &DirectoryQuery) -> Result<Vec<User>>;

    /// Persists name and profile fields of an existing user of the same role.
    /// Verification status is left untouched.
    async fn update_user(&self, user: &User) -> Result<Option<User>>;

    /// Returns `None` when `id` is not a tutor.
    async fn set_verification_status(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> Result<Option<User>>;

    /// Always inserts in state `Pending`.
    async fn insert_session_request(&self, request: NewSessionRequest) -> Result<SessionRequest>;

    async fn find_session_request(&self, id: Uuid) -> Result<Option<SessionRequest>>;

    async fn list_session_requests(&self, filter: SessionFilter) -> Result<Vec<SessionRequest>>;

    /// Conditional update. Returns `None` if the request does not exist or its
    /// status is no longer `expected`.
    async fn resolve_session_request(
        &self,
        id: Uuid,
        expected: SessionStatus,
        status: SessionStatus,
    ) -> Result<Option<SessionRequest>>;

    async fn insert_feedback(&self, feedback: NewFeedback) -> Result<Feedback>;

    async fn list_feedback(&self) -> Result<Vec<Feedback>>;
}

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = eyre::Report>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, new_user: NewUser) -> Result<Option<User>> {
        user::create_user(&self.pool, &new_user)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        user::get_user_by_id(&self.pool, id)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        user::get_user_by_email(&self.pool, email)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        convert_all(user::get_users_by_ids(&self.pool, ids).await?)
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>> {
        convert_all(user::list_users(&self.pool, role).await?)
    }

    async fn search_users(&self, query: &DirectoryQuery) -> Result<Vec<User>> {
        let rows = user::search_users(
            &self.pool,
            query.target(),
            query.text(),
            query.match_subjects(),
        )
        .await?;
        convert_all(rows)
    }

    async fn update_user(&self, updated: &User) -> Result<Option<User>> {
        user::update_user_profile(&self.pool, updated.id, &updated.name, &updated.profile)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn set_verification_status(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> Result<Option<User>> {
        user::update_verification_status(&self.pool, id, status)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn insert_session_request(&self, request: NewSessionRequest) -> Result<SessionRequest> {
        session_request::create_session_request(&self.pool, &request)
            .await?
            .try_into()
    }

    async fn find_session_request(&self, id: Uuid) -> Result<Option<SessionRequest>> {
        session_request::get_session_request_by_id(&self.pool, id)
            .await?
            .map(SessionRequest::try_from)
            .transpose()
    }

    async fn list_session_requests(&self, filter: SessionFilter) -> Result<Vec<SessionRequest>> {
        convert_all(session_request::list_session_requests(&self.pool, filter).await?)
    }

    async fn resolve_session_request(
        &self,
        id: Uuid,
        expected: SessionStatus,
        status: SessionStatus,
    ) -> Result<Option<SessionRequest>> {
        session_request::update_status_if(&self.pool, id, expected, status)
            .await?
            .map(SessionRequest::try_from)
            .transpose()
    }

    async fn insert_feedback(&self, new_feedback: NewFeedback) -> Result<Feedback> {
        feedback::create_feedback(&self.pool, &new_feedback)
            .await?
            .try_into()
    }

    async fn list_feedback(&self) -> Result<Vec<Feedback>> {
        convert_all(feedback::list_feedback(&self.pool).await?)
    }
}
