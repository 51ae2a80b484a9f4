//! Member service: the add-member action plus removal, joining and listing.

use sqlx::SqlitePool;
use tracing::{error, info};

use super::readable_room;
use crate::entities::{AddMemberRequest, RoomMember};
use crate::repositories::{MemberRepository, RoomRepository};
use crate::types::{ActionFailure, ActionResult, ChatError, ChatResult};
use crate::utils::{PermissionChecker, Validator};

use super::room_service::NOT_AUTHENTICATED;

pub const ALREADY_MEMBER: &str = "User is already a member of the room";
pub const MEMBER_ADDED: &str = "User added to room successfully";

/// Service for membership operations
#[derive(Clone)]
pub struct MemberService {
    rooms: RoomRepository,
    members: MemberRepository,
}

impl MemberService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            rooms: RoomRepository::new(pool.clone()),
            members: MemberRepository::new(pool),
        }
    }

    /// Invite a user into a room on behalf of the current user.
    pub async fn add_user_to_room(
        &self,
        current_user: Option<&str>,
        request: AddMemberRequest,
    ) -> ActionResult {
        let Some(actor_id) = current_user else {
            return ActionResult::failure(ActionFailure::Unauthenticated, NOT_AUTHENTICATED);
        };

        match self.invite(actor_id, &request).await {
            Ok(true) => ActionResult::success(MEMBER_ADDED),
            Ok(false) => ActionResult::failure(ActionFailure::AlreadyMember, ALREADY_MEMBER),
            Err(err) => {
                error!(
                    actor_id = %actor_id,
                    room_id = %request.room_id,
                    user_id = %request.user_id,
                    error = %err,
                    "failed to add user to room"
                );
                let kind = match &err {
                    ChatError::Validation { .. } => ActionFailure::InvalidInput,
                    ChatError::Database(_) | ChatError::Internal { .. } => ActionFailure::Internal,
                    _ => ActionFailure::Rejected,
                };
                ActionResult::failure(kind, err.to_string())
            }
        }
    }

    async fn invite(&self, actor_id: &str, request: &AddMemberRequest) -> ChatResult<bool> {
        Validator::uuid(&request.room_id)?;
        Validator::uuid(&request.user_id)?;
        self.members
            .invite(actor_id, &request.room_id, &request.user_id)
            .await
    }

    /// Join a public room. Returns `false` when already a member.
    pub async fn join_room(&self, user_id: &str, room_id: &str) -> ChatResult<bool> {
        let room = self
            .rooms
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| ChatError::room_not_found(room_id))?;

        if !room.is_public {
            return Err(ChatError::access_denied(
                "Private rooms can only be joined by invitation",
            ));
        }

        self.members.add(room_id, user_id).await
    }

    /// Remove a member. Returns `false` when they were not a member.
    pub async fn remove_member(&self, actor_id: &str, room_id: &str, user_id: &str) -> ChatResult<bool> {
        if self.rooms.find_by_id(room_id).await?.is_none() {
            return Err(ChatError::room_not_found(room_id));
        }

        let owner_id = self.members.owner_id(room_id).await?;
        PermissionChecker::can_remove_member(actor_id, user_id, owner_id.as_deref())?;

        let removed = self.members.remove(room_id, user_id).await?;
        if removed && actor_id != user_id {
            info!(room_id = %room_id, actor_id = %actor_id, user_id = %user_id, "member removed by owner");
        }
        Ok(removed)
    }

    pub async fn list_members(&self, viewer_id: &str, room_id: &str) -> ChatResult<Vec<RoomMember>> {
        readable_room(&self.rooms, &self.members, room_id, viewer_id).await?;
        self.members.list(room_id).await
    }

    pub async fn is_member(&self, room_id: &str, user_id: &str) -> ChatResult<bool> {
        self.members.is_member(room_id, user_id).await
    }
}
