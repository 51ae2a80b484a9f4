//! Repository for message data access operations.

use parley_database::now_timestamp;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{membership_exists, room_exists};
use crate::entities::{MessageSearchHit, RoomMessage, UserMessageStats};
use crate::types::{ChatError, ChatResult};
use crate::utils::Pagination;

/// Repository for message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Post a message to a room the author belongs to.
    pub async fn post(&self, author_id: &str, room_id: &str, text: &str) -> ChatResult<RoomMessage> {
        let mut tx = self.pool.begin().await?;

        if !room_exists(&mut tx, room_id).await? {
            return Err(ChatError::room_not_found(room_id));
        }
        if !membership_exists(&mut tx, room_id, author_id).await? {
            return Err(ChatError::access_denied(
                "Only room members can post messages",
            ));
        }

        let author = sqlx::query("SELECT name, image_url FROM user_profile WHERE id = ?")
            .bind(author_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ChatError::user_not_found(author_id))?;

        let message = RoomMessage {
            id: Uuid::new_v4().to_string(),
            text: text.to_owned(),
            created_at: now_timestamp(),
            author_id: author_id.to_owned(),
            author_name: author.try_get("name")?,
            author_image_url: author.try_get("image_url")?,
        };

        sqlx::query(
            "INSERT INTO message (id, chat_room_id, author_id, text, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(room_id)
        .bind(author_id)
        .bind(&message.text)
        .bind(&message.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(room_id = %room_id, author_id = %author_id, message_id = %message.id, "message posted");
        Ok(message)
    }

    /// One page of a room's messages, newest first. Authorless messages are skipped.
    pub async fn page(&self, room_id: &str, page: Pagination) -> ChatResult<Vec<RoomMessage>> {
        let messages = sqlx::query_as::<_, RoomMessage>(
            "SELECT m.id, m.text, m.created_at,
                    u.id AS author_id, u.name AS author_name, u.image_url AS author_image_url
             FROM message m
             JOIN user_profile u ON u.id = m.author_id
             WHERE m.chat_room_id = ?
             ORDER BY m.created_at DESC, m.rowid DESC
             LIMIT ? OFFSET ?",
        )
        .bind(room_id)
        .bind(page.size)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Number of messages a page walk over the room can reach.
    pub async fn count(&self, room_id: &str) -> ChatResult<i64> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM message WHERE chat_room_id = ? AND author_id IS NOT NULL",
        )
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// One batch of messages in the user's rooms, newest first.
    ///
    /// Each of `prefilter_terms` must be lowercase ASCII; SQLite's `lower`
    /// folds nothing else. Rows still need scoring against the full term list.
    pub async fn search_candidates(
        &self,
        user_id: &str,
        prefilter_terms: &[&str],
        batch_size: i64,
        offset: i64,
    ) -> ChatResult<Vec<MessageSearchHit>> {
        let mut sql = String::from(
            "SELECT m.id AS message_id, m.text, m.created_at,
                    r.id AS room_id, r.name AS room_name,
                    u.id AS author_id, u.name AS author_name
             FROM message m
             JOIN chat_room r ON r.id = m.chat_room_id
             JOIN chat_room_member cm ON cm.chat_room_id = r.id AND cm.member_id = ?
             JOIN user_profile u ON u.id = m.author_id
             WHERE 1 = 1",
        );
        for _ in prefilter_terms {
            sql.push_str(" AND instr(lower(m.text), ?) > 0");
        }
        sql.push_str(" ORDER BY m.created_at DESC, m.rowid DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, MessageSearchHit>(&sql).bind(user_id);
        for term in prefilter_terms {
            query = query.bind(*term);
        }

        let hits = query
            .bind(batch_size)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(hits)
    }

    /// Activity summary for an author; `None` when they have written nothing.
    pub async fn user_stats(&self, user_id: &str) -> ChatResult<Option<UserMessageStats>> {
        let totals = sqlx::query(
            "SELECT COUNT(*) AS total_messages,
                    COUNT(DISTINCT chat_room_id) AS rooms_participated,
                    MIN(created_at) AS first_message_at,
                    MAX(created_at) AS last_message_at
             FROM message
             WHERE author_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let total_messages: i64 = totals.try_get("total_messages")?;
        if total_messages == 0 {
            return Ok(None);
        }

        let first_message_at: Option<String> = totals.try_get("first_message_at")?;
        let last_message_at: Option<String> = totals.try_get("last_message_at")?;
        let (Some(first_message_at), Some(last_message_at)) = (first_message_at, last_message_at)
        else {
            return Err(ChatError::internal("message timestamps missing"));
        };

        let most_active = sqlx::query(
            "SELECT r.id, r.name, COUNT(*) AS message_count, MAX(m.created_at) AS latest
             FROM message m
             JOIN chat_room r ON r.id = m.chat_room_id
             WHERE m.author_id = ?
             GROUP BY r.id, r.name
             ORDER BY message_count DESC, latest DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let (most_active_room_id, most_active_room_name, messages_in_most_active_room) =
            match most_active {
                Some(row) => (
                    Some(row.try_get("id")?),
                    Some(row.try_get("name")?),
                    row.try_get("message_count")?,
                ),
                None => (None, None, 0),
            };

        Ok(Some(UserMessageStats {
            total_messages,
            rooms_participated: totals.try_get("rooms_participated")?,
            first_message_at,
            last_message_at,
            most_active_room_id,
            most_active_room_name,
            messages_in_most_active_room,
        }))
    }
}
