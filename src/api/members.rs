use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use super::error::ApiError;
use super::routes::AppState;
use crate::models::{Member, MemberUpdate, NewMember};

const MEMBER_NOT_FOUND: &str = "Member not found";

pub fn member_routes(state: AppState) -> Router {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route(
            "/members/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
        .with_state(state)
}

/// Register a new member
#[instrument(skip_all)]
pub async fn create_member(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = body?;
    let member = NewMember::from_json(&body)?;

    let id = state.members.create(member).await?;
    info!(member_id = id, "Member created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "New Member added successfully",
            "id": id
        })),
    ))
}

/// List every member
pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, ApiError> {
    let members = state.members.list().await?;
    Ok(Json(members))
}

pub async fn get_member(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Member>, ApiError> {
    let Path(id) = path?;

    match state.members.find_by_id(id).await? {
        Some(member) => Ok(Json(member)),
        None => {
            debug!(member_id = id, "Member lookup missed");
            Err(ApiError::not_found(MEMBER_NOT_FOUND))
        }
    }
}

/// Replace a member's name, age, email and phone
#[instrument(skip(state, body))]
pub async fn update_member(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;
    let Json(body) = body?;
    let update = MemberUpdate::from_json(&body)?;

    if !state.members.replace(id, update).await? {
        return Err(ApiError::not_found(MEMBER_NOT_FOUND));
    }
    info!(member_id = id, "Member updated");

    Ok(Json(json!({ "message": "Member updated successfully" })))
}

/// Remove a member together with all of their workout sessions
#[instrument(skip(state))]
pub async fn delete_member(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;

    if !state.members.delete(id).await? {
        return Err(ApiError::not_found(MEMBER_NOT_FOUND));
    }
    info!(member_id = id, "Member removed");

    Ok(Json(json!({ "message": "Member removed successfully" })))
}
