//! Member REST endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use parley_chats::{ActionFailure, ActionResult, AddMemberRequest, RoomMember};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::rooms::ActionResultResponse;
use crate::error::{ErrorResponse, GatewayResult};
use crate::middleware::{CurrentUser, MaybeUser};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub member_id: String,
    pub name: String,
    pub image_url: String,
    pub joined_at: String,
}

impl From<RoomMember> for MemberResponse {
    fn from(member: RoomMember) -> Self {
        Self {
            member_id: member.member_id,
            name: member.name,
            image_url: member.image_url,
            joined_at: member.joined_at,
        }
    }
}

/// Documented shape of the add-member payload. A missing or malformed body
/// reaches the action as an empty user id.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddMemberBody {
    #[serde(rename = "userId", alias = "user_id", default)]
    pub user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveMemberResponse {
    pub removed: bool,
}

/// Create member routes
pub fn create_member_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/rooms/:room_id/members", get(list_members).post(add_member))
        .route("/rooms/:room_id/members/:user_id", delete(remove_member))
}

fn action_status(result: &ActionResult) -> StatusCode {
    match result.failure_kind() {
        None => StatusCode::OK,
        Some(ActionFailure::Unauthenticated) => StatusCode::UNAUTHORIZED,
        Some(ActionFailure::AlreadyMember) => StatusCode::CONFLICT,
        Some(_) => StatusCode::BAD_REQUEST,
    }
}

#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}/members",
    tag = "Members",
    params(("room_id" = String, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Members in join order", body = Vec<MemberResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
pub async fn list_members(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Path(room_id): Path<String>,
) -> GatewayResult<Json<Vec<MemberResponse>>> {
    let members = state.member_service.list_members(&user.id, &room_id).await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/members",
    tag = "Members",
    params(("room_id" = String, Path, description = "Room ID")),
    request_body = AddMemberBody,
    responses(
        (status = 200, description = "User added to room", body = ActionResultResponse),
        (status = 400, description = "Invitation rejected", body = ActionResultResponse),
        (status = 401, description = "User not authenticated", body = ActionResultResponse),
        (status = 409, description = "Already a member", body = ActionResultResponse)
    )
)]
pub async fn add_member(
    State(state): State<Arc<GatewayState>>,
    user: MaybeUser,
    Path(room_id): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<ActionResultResponse>) {
    let body: AddMemberBody = serde_json::from_slice(&body).unwrap_or_default();
    let request = AddMemberRequest {
        room_id,
        user_id: body.user_id,
    };

    let result = state
        .member_service
        .add_user_to_room(user.id(), request)
        .await;

    (action_status(&result), Json(result.into()))
}

#[utoipa::path(
    delete,
    path = "/api/rooms/{room_id}/members/{user_id}",
    tag = "Members",
    params(
        ("room_id" = String, Path, description = "Room ID"),
        ("user_id" = String, Path, description = "Member to remove")
    ),
    responses(
        (status = 200, description = "Removal result", body = RemoveMemberResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the owner may remove others", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
pub async fn remove_member(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Path((room_id, member_id)): Path<(String, String)>,
) -> GatewayResult<Json<RemoveMemberResponse>> {
    let removed = state
        .member_service
        .remove_member(&user.id, &room_id, &member_id)
        .await?;

    Ok(Json(RemoveMemberResponse { removed }))
}
