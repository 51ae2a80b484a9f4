//! Room membership entities.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A member of a room with their public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RoomMember {
    pub member_id: String,
    pub name: String,
    pub image_url: String,
    pub joined_at: String,
}

/// Payload of the add-member action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMemberRequest {
    #[serde(rename = "roomId", alias = "room_id")]
    pub room_id: String,
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: String,
}
