use crate::models::{DbUser, ProfileColumns};
use chrono::Utc;
use educonnect_core::models::user::{NewUser, Role, RoleProfile, VerificationStatus};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, subjects, location, availability, \
     verification_document, verification_status, learning_goals, preferred_subjects, created_at, updated_at";

/// Inserts a user. Returns `None` when the email is already registered.
pub async fn create_user(pool: &Pool<Postgres>, user: &NewUser) -> Result<Option<DbUser>> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let columns = ProfileColumns::from(&user.profile);

    tracing::debug!("Creating user: id={}, role={}", id, user.profile.role());

    let sql = format!(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, subjects, location, availability,
                           verification_document, verification_status, learning_goals,
                           preferred_subjects, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
        ON CONFLICT (email) DO NOTHING
        RETURNING {USER_COLUMNS}
        "#
    );

    let created = sqlx::query_as::<_, DbUser>(&sql)
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.profile.role().as_str())
        .bind(columns.subjects)
        .bind(columns.location)
        .bind(columns.availability)
        .bind(columns.verification_document)
        .bind(columns.verification_status)
        .bind(columns.learning_goals)
        .bind(columns.preferred_subjects)
        .bind(now)
        .fetch_optional(pool)
        .await?;

    Ok(created)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let user = sqlx::query_as::<_, DbUser>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    let user = sqlx::query_as::<_, DbUser>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn get_users_by_ids(pool: &Pool<Postgres>, ids: &[Uuid]) -> Result<Vec<DbUser>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)");
    let users = sqlx::query_as::<_, DbUser>(&sql)
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(users)
}

pub async fn list_users(pool: &Pool<Postgres>, role: Option<Role>) -> Result<Vec<DbUser>> {
    let sql = format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE $1::VARCHAR IS NULL OR role = $1
        ORDER BY created_at ASC
        "#
    );
    let users = sqlx::query_as::<_, DbUser>(&sql)
        .bind(role.map(|r| r.as_str()))
        .fetch_all(pool)
        .await?;

    Ok(users)
}

/// Case-insensitive substring search over `name`, and over `subjects` when
/// `match_subjects` is set.
pub async fn search_users(
    pool: &Pool<Postgres>,
    role: Role,
    text: &str,
    match_subjects: bool,
) -> Result<Vec<DbUser>> {
    let pattern = format!("%{}%", escape_like(text));

    let sql = format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE role = $1
          AND (
            name ILIKE $2
            OR ($3 AND EXISTS (SELECT 1 FROM unnest(subjects) AS subject WHERE subject ILIKE $2))
          )
        ORDER BY created_at ASC
        "#
    );
    let users = sqlx::query_as::<_, DbUser>(&sql)
        .bind(role.as_str())
        .bind(pattern)
        .bind(match_subjects)
        .fetch_all(pool)
        .await?;

    Ok(users)
}

/// Writes name and profile fields. Role, email, credential and verification
/// status are never changed here.
pub async fn update_user_profile(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: &str,
    profile: &RoleProfile,
) -> Result<Option<DbUser>> {
    let columns = ProfileColumns::from(profile);

    let sql = format!(
        r#"
        UPDATE users
        SET name = $2, subjects = $3, location = $4, availability = $5,
            verification_document = $6, learning_goals = $7, preferred_subjects = $8,
            updated_at = $9
        WHERE id = $1 AND role = $10
        RETURNING {USER_COLUMNS}
        "#
    );
    let user = sqlx::query_as::<_, DbUser>(&sql)
        .bind(id)
        .bind(name)
        .bind(columns.subjects)
        .bind(columns.location)
        .bind(columns.availability)
        .bind(columns.verification_document)
        .bind(columns.learning_goals)
        .bind(columns.preferred_subjects)
        .bind(Utc::now())
        .bind(profile.role().as_str())
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn update_verification_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: VerificationStatus,
) -> Result<Option<DbUser>> {
    let sql = format!(
        r#"
        UPDATE users
        SET verification_status = $2, updated_at = $3
        WHERE id = $1 AND role = 'tutor'
        RETURNING {USER_COLUMNS}
        "#
    );
    let user = sqlx::query_as::<_, DbUser>(&sql)
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
