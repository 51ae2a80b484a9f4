//! Message entities.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A message in a room page, joined with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RoomMessage {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub author_id: String,
    pub author_name: String,
    pub author_image_url: String,
}

/// A message matched by a search, with the room it was posted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MessageSearchHit {
    pub message_id: String,
    pub text: String,
    pub created_at: String,
    pub room_id: String,
    pub room_name: String,
    pub author_id: String,
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}
