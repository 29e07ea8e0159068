use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            role VARCHAR(16) NOT NULL CHECK (role IN ('student', 'tutor', 'admin')),
            subjects TEXT[] NULL,
            location VARCHAR(255) NULL,
            availability JSONB NULL,
            verification_document TEXT NULL,
            verification_status VARCHAR(16) NULL DEFAULT 'pending'
                CHECK (verification_status IN ('pending', 'verified', 'rejected')),
            learning_goals TEXT NULL,
            preferred_subjects TEXT[] NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create session_requests table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session_requests (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL REFERENCES users(id),
            tutor_id UUID NOT NULL REFERENCES users(id),
            subject TEXT NOT NULL,
            requested_time TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'accepted', 'declined')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create feedback table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feedback (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            session_request_id UUID NOT NULL REFERENCES session_requests(id),
            reviewer_id UUID NOT NULL REFERENCES users(id),
            reviewee_id UUID NOT NULL REFERENCES users(id),
            rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comments TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
        "CREATE INDEX IF NOT EXISTS idx_session_requests_student_id ON session_requests(student_id)",
        "CREATE INDEX IF NOT EXISTS idx_session_requests_tutor_id ON session_requests(tutor_id)",
        "CREATE INDEX IF NOT EXISTS idx_feedback_session_request_id ON feedback(session_request_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
