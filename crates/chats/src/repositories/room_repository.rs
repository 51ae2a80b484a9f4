//! Repository for chat room data access operations.

use parley_database::now_timestamp;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::user_exists;
use crate::entities::{ChatRoom, PublicRoomSummary, UserRoomSummary};
use crate::types::{ChatError, ChatResult};

/// Repository for room database operations
#[derive(Clone)]
pub struct RoomRepository {
    pool: SqlitePool,
}

impl RoomRepository {
    /// Create a new room repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a room and enrol its owner as the first member.
    ///
    /// Both rows are written in one transaction; a missing owner leaves
    /// nothing behind.
    pub async fn create_with_owner(
        &self,
        owner_id: &str,
        name: &str,
        is_public: bool,
    ) -> ChatResult<ChatRoom> {
        let mut tx = self.pool.begin().await?;

        if !user_exists(&mut tx, owner_id).await? {
            return Err(ChatError::user_not_found(owner_id));
        }

        let room = ChatRoom {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            is_public,
            created_at: now_timestamp(),
        };

        sqlx::query("INSERT INTO chat_room (id, name, is_public, created_at) VALUES (?, ?, ?, ?)")
            .bind(&room.id)
            .bind(&room.name)
            .bind(room.is_public)
            .bind(&room.created_at)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO chat_room_member (chat_room_id, member_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(&room.id)
        .bind(owner_id)
        .bind(&room.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(room_id = %room.id, owner_id = %owner_id, is_public, "created chat room");
        Ok(room)
    }

    pub async fn find_by_id(&self, room_id: &str) -> ChatResult<Option<ChatRoom>> {
        let room = sqlx::query_as::<_, ChatRoom>(
            "SELECT id, name, is_public, created_at FROM chat_room WHERE id = ?",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Public rooms, newest first.
    pub async fn public_rooms(&self) -> ChatResult<Vec<PublicRoomSummary>> {
        let rooms = sqlx::query_as::<_, PublicRoomSummary>(
            "SELECT r.id, r.name, r.created_at,
                    (SELECT COUNT(*) FROM chat_room_member cm WHERE cm.chat_room_id = r.id) AS member_count
             FROM chat_room r
             WHERE r.is_public = 1
             ORDER BY r.created_at DESC, r.rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Rooms the user belongs to, most recently active first.
    pub async fn user_rooms(&self, user_id: &str) -> ChatResult<Vec<UserRoomSummary>> {
        let rooms = sqlx::query_as::<_, UserRoomSummary>(
            "SELECT r.id, r.name, r.is_public, r.created_at,
                    (SELECT COUNT(*) FROM chat_room_member cm WHERE cm.chat_room_id = r.id) AS member_count,
                    COALESCE(
                        (SELECT MAX(m.created_at) FROM message m WHERE m.chat_room_id = r.id),
                        r.created_at
                    ) AS last_message_at
             FROM chat_room r
             JOIN chat_room_member me ON me.chat_room_id = r.id AND me.member_id = ?
             ORDER BY last_message_at DESC, r.rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }
}
