use anyhow::{Context, Result};
use sqlx::PgPool;

/// Idempotent table definitions, applied in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS Members (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        age INTEGER NOT NULL,
        email VARCHAR(320) UNIQUE,
        phone VARCHAR(15)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS WorkoutSessions (
        session_id SERIAL PRIMARY KEY,
        member_id INTEGER REFERENCES Members(id) ON DELETE CASCADE,
        session_date DATE,
        session_time VARCHAR(50),
        activity VARCHAR(255),
        duration_minutes INTEGER,
        calories_burned INTEGER
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS workout_sessions_member_date_idx
        ON WorkoutSessions (member_id, session_date)
    "#,
];

/// Creates the tables when they are missing. Existing data is left alone.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    let mut conn = pool.acquire().await.context("failed to acquire a connection for schema setup")?;

    for statement in SCHEMA_STATEMENTS {
        sqlx::query(*statement)
            .execute(&mut *conn)
            .await
            .context("failed to apply schema statement")?;
    }

    tracing::info!("Database schema is ready");
    Ok(())
}
