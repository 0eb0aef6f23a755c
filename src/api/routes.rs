use axum::{routing::get, Router};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::health::health_check;
use super::members::member_routes;
use super::workout_sessions::workout_session_routes;
use crate::services::{MemberRepository, MemberService, WorkoutSessionRepository, WorkoutSessionService};

/// Storage handles shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub members: Arc<dyn MemberRepository>,
    pub sessions: Arc<dyn WorkoutSessionRepository>,
}

impl AppState {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        sessions: Arc<dyn WorkoutSessionRepository>,
    ) -> Self {
        Self { members, sessions }
    }

    /// State backed by PostgreSQL through a shared pool.
    pub fn postgres(db: PgPool) -> Self {
        Self::new(
            Arc::new(MemberService::new(db.clone())),
            Arc::new(WorkoutSessionService::new(db)),
        )
    }
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(member_routes(state.clone()))
        .merge(workout_session_routes(state))
        .layer(TraceLayer::new_for_http())
}
