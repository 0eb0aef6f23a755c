use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use super::error::ApiError;
use super::routes::AppState;
use crate::models::{parse_iso_date, NewWorkoutSession, WorkoutSessionChanges, WorkoutSessionSummary};

#[derive(Debug, Deserialize)]
pub struct MemberSessionsQuery {
    /// Owner whose sessions are listed (required)
    pub member_id: Option<String>,
}

impl MemberSessionsQuery {
    pub fn member_id(&self) -> Result<i32, &'static str> {
        let raw = self
            .member_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or("Member ID is required")?;

        raw.parse().map_err(|_| "Member ID must be an integer")
    }
}

pub fn workout_session_routes(state: AppState) -> Router {
    Router::new()
        .route("/workout_sessions", post(schedule_session))
        .route(
            "/workout_sessions_by_member_id",
            get(list_sessions_for_member),
        )
        .route(
            "/workout_sessions_by_member_id/:id/:session_date",
            put(update_session_by_member_id),
        )
        .with_state(state)
}

/// Schedule a workout session for a member
#[instrument(skip_all)]
pub async fn schedule_session(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = body?;
    let session = NewWorkoutSession::from_json(&body)?;
    let member_id = session.member_id;

    let session_id = state.sessions.create(session).await?;
    info!(member_id, session_id, "Workout session scheduled");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Workout session scheduled successfully",
            "session_id": session_id
        })),
    ))
}

/// Update the session a member has on the given date.
///
/// Fields left out of the body keep their stored values.
#[instrument(skip(state, body))]
pub async fn update_session_by_member_id(
    State(state): State<AppState>,
    path: Result<Path<(i32, String)>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path((member_id, raw_date)) = path?;
    let session_date = parse_iso_date(&raw_date)
        .ok_or_else(|| ApiError::bad_request("Invalid date format. Use YYYY-MM-DD."))?;

    let Json(body) = body?;
    if body.is_null() || body.as_object().is_some_and(|fields| fields.is_empty()) {
        return Err(ApiError::bad_request("Invalid input"));
    }
    let changes = WorkoutSessionChanges::from_json(&body)?;

    let updated = state
        .sessions
        .update_by_member_and_date(member_id, session_date, changes)
        .await?
        .ok_or_else(|| {
            debug!(member_id, %session_date, "No session on that date");
            ApiError::not_found("Workout session for member not found")
        })?;
    info!(member_id, session_id = updated.session_id, "Workout session updated");

    Ok(Json(json!({
        "message": "Workout session updated successfully",
        "session": WorkoutSessionSummary::from(updated)
    })))
}

/// List the sessions owned by `?member_id=`
pub async fn list_sessions_for_member(
    State(state): State<AppState>,
    query: Result<Query<MemberSessionsQuery>, QueryRejection>,
) -> Result<Json<Vec<WorkoutSessionSummary>>, ApiError> {
    let Query(query) = query?;
    let member_id = query.member_id().map_err(ApiError::bad_request)?;

    let sessions = state.sessions.list_by_member(member_id).await?;

    Ok(Json(
        sessions.into_iter().map(WorkoutSessionSummary::from).collect(),
    ))
}
