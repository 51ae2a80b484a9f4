//! Rows returned by the room procedures and payloads accepted by the actions.

pub mod member;
pub mod message;
pub mod room;
pub mod stats;

pub use member::{AddMemberRequest, RoomMember};
pub use message::{MessageSearchHit, RoomMessage, SendMessageRequest};
pub use room::{ChatRoom, CreateRoomRequest, PublicRoomSummary, UserRoomSummary};
pub use stats::UserMessageStats;
