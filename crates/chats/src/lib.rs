//! # Parley Chats Crate
//!
//! Room, membership and message logic for Parley.
//!
//! ## Architecture
//!
//! - **Entities**: rows returned by the room procedures
//! - **Repositories**: the procedures themselves, as SQL over the shared pool
//! - **Services**: server actions that validate input, check the caller and
//!   map procedure results to redirects or tagged results
//! - **Types**: errors and action results
//! - **Utils**: validation, search ranking and read-access checks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parley_chats::RoomService;
//!
//! let rooms = RoomService::new(pool, config.rooms.clone());
//! let outcome = rooms.create_room(Some(&user_id), payload).await;
//! ```

pub mod entities;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;

pub use entities::{
    AddMemberRequest, ChatRoom, CreateRoomRequest, MessageSearchHit, PublicRoomSummary,
    RoomMember, RoomMessage, UserMessageStats, UserRoomSummary,
};
pub use repositories::{MemberRepository, MessageRepository, RoomRepository};
pub use services::{MemberService, MessageService, RoomService};
pub use types::{ActionFailure, ActionOutcome, ActionResult, ChatError, ChatResult};
