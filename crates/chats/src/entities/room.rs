//! Chat room entities.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::types::ChatResult;
use crate::utils::Validator;

/// A `chat_room` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatRoom {
    pub id: String,
    pub name: String,
    pub is_public: bool,
    pub created_at: String,
}

/// A public room as listed to everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PublicRoomSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub member_count: i64,
}

/// A room the caller belongs to, with activity information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRoomSummary {
    pub id: String,
    pub name: String,
    pub is_public: bool,
    pub created_at: String,
    pub member_count: i64,
    /// Latest message time, or the room creation time for silent rooms.
    pub last_message_at: String,
}

/// Payload of the create-room action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(rename = "isPublic", alias = "is_public", default)]
    pub is_public: bool,
}

impl CreateRoomRequest {
    /// Parse untrusted input, normalising the room name.
    pub fn parse(unsafe_data: Value) -> ChatResult<Self> {
        let mut request: Self = serde_json::from_value(unsafe_data)?;
        request.name = Validator::room_name(&request.name)?;
        Ok(request)
    }
}
