use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::member_service::acquire;
use super::{StorageResult, WorkoutSessionRepository};
use crate::models::{NewWorkoutSession, WorkoutSession, WorkoutSessionChanges};

#[derive(Clone)]
pub struct WorkoutSessionService {
    db: PgPool,
}

impl WorkoutSessionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkoutSessionRepository for WorkoutSessionService {
    async fn create(&self, session: NewWorkoutSession) -> StorageResult<i32> {
        let mut conn = acquire(&self.db).await?;

        let session_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO WorkoutSessions (member_id, session_date, session_time, activity, duration_minutes, calories_burned)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING session_id
            "#,
        )
        .bind(session.member_id)
        .bind(session.session_date)
        .bind(&session.session_time)
        .bind(&session.activity)
        .bind(session.duration_minutes)
        .bind(session.calories_burned)
        .fetch_one(&mut *conn)
        .await?;

        Ok(session_id)
    }

    async fn list_by_member(&self, member_id: i32) -> StorageResult<Vec<WorkoutSession>> {
        let mut conn = acquire(&self.db).await?;

        let sessions = sqlx::query_as::<_, WorkoutSession>(
            r#"
            SELECT session_id, member_id, session_date, session_time, activity, duration_minutes, calories_burned
            FROM WorkoutSessions
            WHERE member_id = $1
            ORDER BY session_date, session_id
            "#,
        )
        .bind(member_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(sessions)
    }

    async fn update_by_member_and_date(
        &self,
        member_id: i32,
        session_date: NaiveDate,
        changes: WorkoutSessionChanges,
    ) -> StorageResult<Option<WorkoutSession>> {
        let mut conn = acquire(&self.db).await?;

        let stored = sqlx::query_as::<_, WorkoutSession>(
            r#"
            SELECT session_id, member_id, session_date, session_time, activity, duration_minutes, calories_burned
            FROM WorkoutSessions
            WHERE member_id = $1 AND session_date = $2
            ORDER BY session_id
            LIMIT 1
            "#,
        )
        .bind(member_id)
        .bind(session_date)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(stored) = stored else {
            return Ok(None);
        };

        let updated = changes.apply_to(&stored);

        sqlx::query(
            r#"
            UPDATE WorkoutSessions
            SET session_date = $1, session_time = $2, activity = $3, duration_minutes = $4, calories_burned = $5
            WHERE session_id = $6
            "#,
        )
        .bind(updated.session_date)
        .bind(&updated.session_time)
        .bind(&updated.activity)
        .bind(updated.duration_minutes)
        .bind(updated.calories_burned)
        .bind(updated.session_id)
        .execute(&mut *conn)
        .await?;

        Ok(Some(updated))
    }
}
