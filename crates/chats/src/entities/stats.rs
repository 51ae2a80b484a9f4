//! Per-user message statistics.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessageStats {
    pub total_messages: i64,
    pub rooms_participated: i64,
    pub first_message_at: String,
    pub last_message_at: String,
    /// `None` when every room the user wrote in has since been deleted.
    pub most_active_room_id: Option<String>,
    pub most_active_room_name: Option<String>,
    pub messages_in_most_active_room: i64,
}
