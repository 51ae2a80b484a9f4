//! Message REST endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use parley_chats::entities::SendMessageRequest;
use parley_chats::{MessageSearchHit, RoomMessage};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ErrorResponse, GatewayResult};
use crate::middleware::CurrentUser;
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub author_id: String,
    pub author_name: String,
    pub author_image_url: String,
}

impl From<RoomMessage> for MessageResponse {
    fn from(message: RoomMessage) -> Self {
        Self {
            id: message.id,
            text: message.text,
            created_at: message.created_at,
            author_id: message.author_id,
            author_name: message.author_name,
            author_image_url: message.author_image_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchHitResponse {
    pub message_id: String,
    pub text: String,
    pub created_at: String,
    pub room_id: String,
    pub room_name: String,
    pub author_id: String,
    pub author_name: String,
}

impl From<MessageSearchHit> for SearchHitResponse {
    fn from(hit: MessageSearchHit) -> Self {
        Self {
            message_id: hit.message_id,
            text: hit.text,
            created_at: hit.created_at,
            room_id: hit.room_id,
            room_name: hit.room_name,
            author_id: hit.author_id,
            author_name: hit.author_name,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageCountResponse {
    pub count: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMessagesQuery {
    /// Defaults to the configured page size; clamped to the configured maximum
    pub page_size: Option<i64>,
    /// Negative offsets are treated as zero
    pub page_offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<i64>,
}

/// Create message routes
pub fn create_message_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(
            "/rooms/:room_id/messages",
            get(list_messages).post(create_message),
        )
        .route("/rooms/:room_id/messages/count", get(count_messages))
        .route("/messages/search", get(search_messages))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}/messages",
    tag = "Messages",
    params(("room_id" = String, Path, description = "Room ID"), ListMessagesQuery),
    responses(
        (status = 200, description = "Messages, newest first", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
pub async fn list_messages(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Path(room_id): Path<String>,
    Query(params): Query<ListMessagesQuery>,
) -> GatewayResult<Json<Vec<MessageResponse>>> {
    let messages = state
        .message_service
        .list_messages(&user.id, &room_id, params.page_size, params.page_offset)
        .await?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/messages",
    tag = "Messages",
    params(("room_id" = String, Path, description = "Room ID")),
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message posted", body = MessageResponse),
        (status = 400, description = "Invalid text", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
pub async fn create_message(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Path(room_id): Path<String>,
    Json(request): Json<CreateMessageRequest>,
) -> GatewayResult<(StatusCode, Json<MessageResponse>)> {
    let message = state
        .message_service
        .send_message(&user.id, &room_id, SendMessageRequest { text: request.text })
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}/messages/count",
    tag = "Messages",
    params(("room_id" = String, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Number of messages in the room", body = MessageCountResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
pub async fn count_messages(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Path(room_id): Path<String>,
) -> GatewayResult<Json<MessageCountResponse>> {
    let count = state
        .message_service
        .message_count(&user.id, &room_id)
        .await?;

    Ok(Json(MessageCountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/api/messages/search",
    tag = "Messages",
    params(SearchQuery),
    responses(
        (status = 200, description = "Ranked matches from the caller's rooms", body = Vec<SearchHitResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn search_messages(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<SearchQuery>,
) -> GatewayResult<Json<Vec<SearchHitResponse>>> {
    let hits = state
        .message_service
        .search(&user.id, &params.q, params.limit)
        .await?;

    Ok(Json(hits.into_iter().map(Into::into).collect()))
}
