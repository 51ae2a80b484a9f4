//! Permission checking utilities.

use crate::entities::ChatRoom;
use crate::types::{ChatError, ChatResult};

/// Permission checking utilities
pub struct PermissionChecker;

impl PermissionChecker {
    /// Public rooms are readable by anyone signed in; private rooms by members.
    pub fn can_read_room(room: &ChatRoom, viewer_is_member: bool) -> ChatResult<()> {
        if room.is_public || viewer_is_member {
            return Ok(());
        }
        Err(ChatError::access_denied("User is not a member of this room"))
    }

    /// Members may leave on their own; only the room owner removes others.
    pub fn can_remove_member(
        actor_id: &str,
        target_id: &str,
        owner_id: Option<&str>,
    ) -> ChatResult<()> {
        if actor_id == target_id {
            return Ok(());
        }
        if owner_id == Some(actor_id) {
            return Ok(());
        }
        Err(ChatError::access_denied(
            "Only the room owner can remove other members",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(is_public: bool) -> ChatRoom {
        ChatRoom {
            id: "room".into(),
            name: "Room".into(),
            is_public,
            created_at: "2024-01-01T00:00:00.000000Z".into(),
        }
    }

    #[test]
    fn read_access() {
        assert!(PermissionChecker::can_read_room(&room(true), false).is_ok());
        assert!(PermissionChecker::can_read_room(&room(false), true).is_ok());
        assert!(matches!(
            PermissionChecker::can_read_room(&room(false), false),
            Err(ChatError::AccessDenied { .. })
        ));
    }

    #[test]
    fn removal_rules() {
        assert!(PermissionChecker::can_remove_member("a", "a", Some("b")).is_ok());
        assert!(PermissionChecker::can_remove_member("owner", "a", Some("owner")).is_ok());
        assert!(PermissionChecker::can_remove_member("a", "b", Some("owner")).is_err());
        assert!(PermissionChecker::can_remove_member("a", "b", None).is_err());
    }
}
