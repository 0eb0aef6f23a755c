// Storage ports and their PostgreSQL implementations

pub mod error;
pub mod member_service;
pub mod schema;
pub mod workout_session_service;

pub use error::{StorageError, StorageResult};
pub use member_service::MemberService;
pub use schema::ensure_schema;
pub use workout_session_service::WorkoutSessionService;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{
    Member, MemberUpdate, NewMember, NewWorkoutSession, WorkoutSession, WorkoutSessionChanges,
};

/// Persistence for member profiles.
///
/// Every method is a single round trip on one pooled connection, released
/// before the method returns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Inserts a member and returns its server-assigned id.
    async fn create(&self, member: NewMember) -> StorageResult<i32>;

    /// All members ordered by id.
    async fn list(&self) -> StorageResult<Vec<Member>>;

    async fn find_by_id(&self, id: i32) -> StorageResult<Option<Member>>;

    /// Replaces every mutable field. Returns `false` when no member has this id.
    async fn replace(&self, id: i32, update: MemberUpdate) -> StorageResult<bool>;

    /// Deletes the member and, through the foreign key, all of its sessions.
    /// Returns `false` when no member has this id.
    async fn delete(&self, id: i32) -> StorageResult<bool>;
}

/// Persistence for workout sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutSessionRepository: Send + Sync {
    /// Inserts a session and returns its server-assigned id.
    async fn create(&self, session: NewWorkoutSession) -> StorageResult<i32>;

    /// Sessions owned by `member_id`, ordered by date then id.
    async fn list_by_member(&self, member_id: i32) -> StorageResult<Vec<WorkoutSession>>;

    /// Applies `changes` to the session `member_id` has on `session_date`.
    ///
    /// When several sessions share that date, the one with the lowest id is
    /// updated. Returns `None` when the member has no session on that date.
    async fn update_by_member_and_date(
        &self,
        member_id: i32,
        session_date: NaiveDate,
        changes: WorkoutSessionChanges,
    ) -> StorageResult<Option<WorkoutSession>>;
}
