//! Room REST endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use parley_chats::{
    ActionFailure, ActionOutcome, ActionResult, ChatRoom, PublicRoomSummary, UserRoomSummary,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, GatewayResult};
use crate::middleware::{CurrentUser, MaybeUser};
use crate::state::GatewayState;

/// Documented shape of the create-room payload; the handler accepts any JSON.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomBody {
    pub name: String,
    #[serde(rename = "isPublic")]
    pub is_public: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResultResponse {
    pub error: bool,
    pub message: String,
}

impl From<ActionResult> for ActionResultResponse {
    fn from(result: ActionResult) -> Self {
        Self {
            error: result.error,
            message: result.message,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub is_public: bool,
    pub created_at: String,
}

impl From<ChatRoom> for RoomResponse {
    fn from(room: ChatRoom) -> Self {
        Self {
            id: room.id,
            name: room.name,
            is_public: room.is_public,
            created_at: room.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicRoomResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub member_count: i64,
}

impl From<PublicRoomSummary> for PublicRoomResponse {
    fn from(room: PublicRoomSummary) -> Self {
        Self {
            id: room.id,
            name: room.name,
            created_at: room.created_at,
            member_count: room.member_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserRoomResponse {
    pub id: String,
    pub name: String,
    pub is_public: bool,
    pub created_at: String,
    pub member_count: i64,
    pub last_message_at: String,
}

impl From<UserRoomSummary> for UserRoomResponse {
    fn from(room: UserRoomSummary) -> Self {
        Self {
            id: room.id,
            name: room.name,
            is_public: room.is_public,
            created_at: room.created_at,
            member_count: room.member_count,
            last_message_at: room.last_message_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JoinRoomResponse {
    pub joined: bool,
}

/// Create room routes
pub fn create_room_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/rooms", get(list_public_rooms).post(create_room))
        .route("/rooms/:room_id", get(get_room))
        .route("/rooms/:room_id/join", post(join_room))
        .route("/me/rooms", get(list_my_rooms))
}

fn action_status(result: &ActionResult) -> StatusCode {
    match result.failure_kind() {
        None => StatusCode::OK,
        Some(ActionFailure::Unauthenticated) => StatusCode::UNAUTHORIZED,
        Some(ActionFailure::InvalidInput) => StatusCode::BAD_REQUEST,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "Rooms",
    request_body = CreateRoomBody,
    responses(
        (status = 303, description = "Room created; Location points at it"),
        (status = 400, description = "Invalid room data", body = ActionResultResponse),
        (status = 401, description = "User not authenticated", body = ActionResultResponse),
        (status = 500, description = "Failed to create room", body = ActionResultResponse)
    )
)]
pub async fn create_room(
    State(state): State<Arc<GatewayState>>,
    user: MaybeUser,
    body: Bytes,
) -> Response {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    match state.room_service.create_room(user.id(), payload).await {
        ActionOutcome::Redirect(target) => Redirect::to(&target).into_response(),
        ActionOutcome::Completed(result) => {
            let status = action_status(&result);
            (status, Json(ActionResultResponse::from(result))).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "Rooms",
    responses(
        (status = 200, description = "Public rooms, newest first", body = Vec<PublicRoomResponse>)
    )
)]
pub async fn list_public_rooms(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<PublicRoomResponse>>> {
    let rooms = state.room_service.public_rooms().await?;
    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}",
    tag = "Rooms",
    params(("room_id" = String, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room details", body = RoomResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Private room", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
pub async fn get_room(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Path(room_id): Path<String>,
) -> GatewayResult<Json<RoomResponse>> {
    let room = state.room_service.room(&user.id, &room_id).await?;
    Ok(Json(room.into()))
}

#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/join",
    tag = "Rooms",
    params(("room_id" = String, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Joined, or already a member", body = JoinRoomResponse),
        (status = 403, description = "Private room", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
pub async fn join_room(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Path(room_id): Path<String>,
) -> GatewayResult<Json<JoinRoomResponse>> {
    let joined = state.member_service.join_room(&user.id, &room_id).await?;
    Ok(Json(JoinRoomResponse { joined }))
}

#[utoipa::path(
    get,
    path = "/api/me/rooms",
    tag = "Rooms",
    responses(
        (status = 200, description = "Rooms the caller belongs to", body = Vec<UserRoomResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_my_rooms(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
) -> GatewayResult<Json<Vec<UserRoomResponse>>> {
    let rooms = state.room_service.my_rooms(&user.id).await?;
    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}
