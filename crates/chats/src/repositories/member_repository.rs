//! Repository for room membership data access operations.

use parley_database::now_timestamp;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{membership_exists, room_exists, user_exists};
use crate::entities::RoomMember;
use crate::types::{ChatError, ChatResult};

const INSERT_MEMBERSHIP: &str = "INSERT INTO chat_room_member (chat_room_id, member_id, created_at)
     VALUES (?, ?, ?)
     ON CONFLICT (chat_room_id, member_id) DO NOTHING";

/// Repository for membership database operations
#[derive(Clone)]
pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    /// Create a new member repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a user to a room. Returns `false` when they already belong to it.
    pub async fn add(&self, room_id: &str, user_id: &str) -> ChatResult<bool> {
        let mut conn = self.pool.acquire().await?;

        if !room_exists(&mut conn, room_id).await? {
            return Err(ChatError::room_not_found(room_id));
        }
        if !user_exists(&mut conn, user_id).await? {
            return Err(ChatError::user_not_found(user_id));
        }

        let result = sqlx::query(INSERT_MEMBERSHIP)
            .bind(room_id)
            .bind(user_id)
            .bind(now_timestamp())
            .execute(&mut *conn)
            .await?;

        let inserted = result.rows_affected() == 1;
        debug!(room_id = %room_id, user_id = %user_id, inserted, "add user to room");
        Ok(inserted)
    }

    /// Add `member_id` to a room on behalf of `actor_id`, who must already be a member.
    ///
    /// Returns `false` when the invitee is already a member.
    pub async fn invite(&self, actor_id: &str, room_id: &str, member_id: &str) -> ChatResult<bool> {
        let mut tx = self.pool.begin().await?;

        if !room_exists(&mut tx, room_id).await? {
            return Err(ChatError::room_not_found(room_id));
        }
        if !membership_exists(&mut tx, room_id, actor_id).await? {
            return Err(ChatError::access_denied(
                "Only room members can invite new members",
            ));
        }
        if !user_exists(&mut tx, member_id).await? {
            return Err(ChatError::user_not_found(member_id));
        }

        let result = sqlx::query(INSERT_MEMBERSHIP)
            .bind(room_id)
            .bind(member_id)
            .bind(now_timestamp())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let inserted = result.rows_affected() == 1;
        if inserted {
            info!(room_id = %room_id, actor_id = %actor_id, member_id = %member_id, "member invited");
        }
        Ok(inserted)
    }

    pub async fn is_member(&self, room_id: &str, user_id: &str) -> ChatResult<bool> {
        let mut conn = self.pool.acquire().await?;
        membership_exists(&mut conn, room_id, user_id).await
    }

    /// Returns `true` when a membership row was deleted.
    pub async fn remove(&self, room_id: &str, user_id: &str) -> ChatResult<bool> {
        let result = sqlx::query("DELETE FROM chat_room_member WHERE chat_room_id = ? AND member_id = ?")
            .bind(room_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(room_id = %room_id, user_id = %user_id, "member removed");
        }
        Ok(removed)
    }

    /// Members with their profiles, in join order.
    pub async fn list(&self, room_id: &str) -> ChatResult<Vec<RoomMember>> {
        let members = sqlx::query_as::<_, RoomMember>(
            "SELECT cm.member_id, u.name, u.image_url, cm.created_at AS joined_at
             FROM chat_room_member cm
             JOIN user_profile u ON u.id = cm.member_id
             WHERE cm.chat_room_id = ?
             ORDER BY cm.created_at ASC, cm.rowid ASC",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// The longest-standing member, which is the creator until they leave.
    pub async fn owner_id(&self, room_id: &str) -> ChatResult<Option<String>> {
        let owner = sqlx::query_scalar(
            "SELECT member_id FROM chat_room_member
             WHERE chat_room_id = ?
             ORDER BY created_at ASC, rowid ASC
             LIMIT 1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }
}
