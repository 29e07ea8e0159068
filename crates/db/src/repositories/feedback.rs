use crate::models::DbFeedback;
use chrono::Utc;
use educonnect_core::models::feedback::NewFeedback;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_feedback(pool: &Pool<Postgres>, feedback: &NewFeedback) -> Result<DbFeedback> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let created = sqlx::query_as::<_, DbFeedback>(
        r#"
        INSERT INTO feedback (id, session_request_id, reviewer_id, reviewee_id, rating, comments, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, session_request_id, reviewer_id, reviewee_id, rating, comments, created_at
        "#,
    )
    .bind(id)
    .bind(feedback.session_request_id)
    .bind(feedback.reviewer_id)
    .bind(feedback.reviewee_id)
    .bind(i16::from(feedback.rating.value()))
    .bind(&feedback.comments)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn list_feedback(pool: &Pool<Postgres>) -> Result<Vec<DbFeedback>> {
    let feedback = sqlx::query_as::<_, DbFeedback>(
        r#"
        SELECT id, session_request_id, reviewer_id, reviewee_id, rating, comments, created_at
        FROM feedback
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(feedback)
}
