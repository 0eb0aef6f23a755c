use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};

use super::{MemberRepository, StorageError, StorageResult};
use crate::models::{Member, MemberUpdate, NewMember};

#[derive(Clone)]
pub struct MemberService {
    db: PgPool,
}

impl MemberService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Checks a connection out of the pool. The guard hands it back when dropped.
pub(crate) async fn acquire(db: &PgPool) -> StorageResult<PoolConnection<Postgres>> {
    db.acquire().await.map_err(StorageError::Connection)
}

#[async_trait]
impl MemberRepository for MemberService {
    async fn create(&self, member: NewMember) -> StorageResult<i32> {
        let mut conn = acquire(&self.db).await?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO Members (name, age, email, phone) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&member.name)
        .bind(member.age)
        .bind(&member.email)
        .bind(&member.phone)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    async fn list(&self) -> StorageResult<Vec<Member>> {
        let mut conn = acquire(&self.db).await?;

        let members = sqlx::query_as::<_, Member>(
            "SELECT id, name, age, email, phone FROM Members ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(members)
    }

    async fn find_by_id(&self, id: i32) -> StorageResult<Option<Member>> {
        let mut conn = acquire(&self.db).await?;

        let member = sqlx::query_as::<_, Member>(
            "SELECT id, name, age, email, phone FROM Members WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(member)
    }

    async fn replace(&self, id: i32, update: MemberUpdate) -> StorageResult<bool> {
        let mut conn = acquire(&self.db).await?;

        let result = sqlx::query(
            "UPDATE Members SET name = $1, age = $2, email = $3, phone = $4 WHERE id = $5",
        )
        .bind(&update.name)
        .bind(update.age)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> StorageResult<bool> {
        let mut conn = acquire(&self.db).await?;

        let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM Members WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        if exists.is_none() {
            return Ok(false);
        }

        // Owned WorkoutSessions rows go with it (ON DELETE CASCADE).
        sqlx::query("DELETE FROM Members WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(true)
    }
}
