use crate::models::DbSessionRequest;
use chrono::Utc;
use educonnect_core::models::session::{NewSessionRequest, SessionFilter, SessionStatus};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_session_request(
    pool: &Pool<Postgres>,
    request: &NewSessionRequest,
) -> Result<DbSessionRequest> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let session_request = sqlx::query_as::<_, DbSessionRequest>(
        r#"
        INSERT INTO session_requests (id, student_id, tutor_id, subject, requested_time, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, 'pending', $6, $6)
        RETURNING id, student_id, tutor_id, subject, requested_time, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(request.student_id)
    .bind(request.tutor_id)
    .bind(&request.subject)
    .bind(request.requested_time)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(session_request)
}

pub async fn get_session_request_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbSessionRequest>> {
    let session_request = sqlx::query_as::<_, DbSessionRequest>(
        r#"
        SELECT id, student_id, tutor_id, subject, requested_time, status, created_at, updated_at
        FROM session_requests
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(session_request)
}

pub async fn list_session_requests(
    pool: &Pool<Postgres>,
    filter: SessionFilter,
) -> Result<Vec<DbSessionRequest>> {
    let (student_id, tutor_id) = match filter {
        SessionFilter::All => (None, None),
        SessionFilter::Student(id) => (Some(id), None),
        SessionFilter::Tutor(id) => (None, Some(id)),
    };

    let session_requests = sqlx::query_as::<_, DbSessionRequest>(
        r#"
        SELECT id, student_id, tutor_id, subject, requested_time, status, created_at, updated_at
        FROM session_requests
        WHERE ($1::UUID IS NULL OR student_id = $1)
          AND ($2::UUID IS NULL OR tutor_id = $2)
        ORDER BY created_at ASC
        "#,
    )
    .bind(student_id)
    .bind(tutor_id)
    .fetch_all(pool)
    .await?;

    Ok(session_requests)
}

/// Compare-and-swap on the status column: the row is only updated when its
/// current status still equals `expected`. Returns `None` when no row matched.
pub async fn update_status_if(
    pool: &Pool<Postgres>,
    id: Uuid,
    expected: SessionStatus,
    status: SessionStatus,
) -> Result<Option<DbSessionRequest>> {
    let session_request = sqlx::query_as::<_, DbSessionRequest>(
        r#"
        UPDATE session_requests
        SET status = $3, updated_at = $4
        WHERE id = $1 AND status = $2
        RETURNING id, student_id, tutor_id, subject, requested_time, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(expected.as_str())
    .bind(status.as_str())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(session_request)
}
