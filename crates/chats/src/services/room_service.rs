//! Room service: the create-room action and room listings.

use parley_config::RoomsConfig;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{error, warn};

use super::readable_room;
use crate::entities::{ChatRoom, CreateRoomRequest, PublicRoomSummary, UserRoomSummary};
use crate::repositories::{MemberRepository, RoomRepository};
use crate::types::{ActionFailure, ActionOutcome, ActionResult, ChatResult};

pub const INVALID_ROOM_DATA: &str = "Invalid room data";
pub const NOT_AUTHENTICATED: &str = "User not authenticated";
pub const ROOM_CREATION_FAILED: &str = "Failed to create room";

/// Service for room operations
#[derive(Clone)]
pub struct RoomService {
    rooms: RoomRepository,
    members: MemberRepository,
    config: RoomsConfig,
}

impl RoomService {
    pub fn new(pool: SqlitePool, config: RoomsConfig) -> Self {
        Self {
            rooms: RoomRepository::new(pool.clone()),
            members: MemberRepository::new(pool),
            config,
        }
    }

    /// Validate the payload, create the room with the caller as owner and
    /// redirect to it.
    pub async fn create_room(&self, current_user: Option<&str>, unsafe_data: Value) -> ActionOutcome {
        let request = match CreateRoomRequest::parse(unsafe_data) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "rejected room payload");
                return ActionResult::failure(ActionFailure::InvalidInput, INVALID_ROOM_DATA).into();
            }
        };

        let Some(owner_id) = current_user else {
            return ActionResult::failure(ActionFailure::Unauthenticated, NOT_AUTHENTICATED).into();
        };

        match self
            .rooms
            .create_with_owner(owner_id, &request.name, request.is_public)
            .await
        {
            Ok(room) => ActionOutcome::Redirect(self.room_path(&room.id)),
            Err(err) => {
                error!(owner_id = %owner_id, error = %err, "failed to create room");
                ActionResult::failure(ActionFailure::Internal, ROOM_CREATION_FAILED).into()
            }
        }
    }

    pub fn room_path(&self, room_id: &str) -> String {
        format!("{}/{}", self.config.redirect_base.trim_end_matches('/'), room_id)
    }

    pub async fn room(&self, viewer_id: &str, room_id: &str) -> ChatResult<ChatRoom> {
        readable_room(&self.rooms, &self.members, room_id, viewer_id).await
    }

    pub async fn public_rooms(&self) -> ChatResult<Vec<PublicRoomSummary>> {
        self.rooms.public_rooms().await
    }

    pub async fn my_rooms(&self, user_id: &str) -> ChatResult<Vec<UserRoomSummary>> {
        self.rooms.user_rooms(user_id).await
    }
}
