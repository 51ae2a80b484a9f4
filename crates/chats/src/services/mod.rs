//! Server actions and read-side helpers built on the repositories.

pub mod member_service;
pub mod message_service;
pub mod room_service;

pub use member_service::MemberService;
pub use message_service::MessageService;
pub use room_service::RoomService;

use crate::entities::ChatRoom;
use crate::repositories::{MemberRepository, RoomRepository};
use crate::types::{ChatError, ChatResult};
use crate::utils::PermissionChecker;

/// Load a room the viewer is allowed to read.
pub(crate) async fn readable_room(
    rooms: &RoomRepository,
    members: &MemberRepository,
    room_id: &str,
    viewer_id: &str,
) -> ChatResult<ChatRoom> {
    let room = rooms
        .find_by_id(room_id)
        .await?
        .ok_or_else(|| ChatError::room_not_found(room_id))?;

    let is_member = room.is_public || members.is_member(room_id, viewer_id).await?;
    PermissionChecker::can_read_room(&room, is_member)?;

    Ok(room)
}
