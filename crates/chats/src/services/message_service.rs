//! Message service: posting, paging, search and per-user statistics.

use parley_config::RoomsConfig;
use sqlx::SqlitePool;

use super::readable_room;
use crate::entities::{MessageSearchHit, RoomMessage, SendMessageRequest, UserMessageStats};
use crate::repositories::{MemberRepository, MessageRepository, RoomRepository};
use crate::types::ChatResult;
use crate::utils::search::{rank_hits, search_terms};
use crate::utils::{Pagination, Validator};

/// Rows pulled from the database per ranking pass.
const SEARCH_BATCH_SIZE: i64 = 500;

/// Service for managing message operations
#[derive(Clone)]
pub struct MessageService {
    rooms: RoomRepository,
    members: MemberRepository,
    messages: MessageRepository,
    config: RoomsConfig,
}

impl MessageService {
    pub fn new(pool: SqlitePool, config: RoomsConfig) -> Self {
        Self {
            rooms: RoomRepository::new(pool.clone()),
            members: MemberRepository::new(pool.clone()),
            messages: MessageRepository::new(pool),
            config,
        }
    }

    pub async fn send_message(
        &self,
        author_id: &str,
        room_id: &str,
        request: SendMessageRequest,
    ) -> ChatResult<RoomMessage> {
        let text = Validator::message_text(&request.text)?;
        self.messages.post(author_id, room_id, &text).await
    }

    pub async fn list_messages(
        &self,
        viewer_id: &str,
        room_id: &str,
        page_size: Option<i64>,
        page_offset: Option<i64>,
    ) -> ChatResult<Vec<RoomMessage>> {
        readable_room(&self.rooms, &self.members, room_id, viewer_id).await?;
        let page = Pagination::new(page_size, page_offset, &self.config);
        self.messages.page(room_id, page).await
    }

    pub async fn message_count(&self, viewer_id: &str, room_id: &str) -> ChatResult<i64> {
        readable_room(&self.rooms, &self.members, room_id, viewer_id).await?;
        self.messages.count(room_id).await
    }

    /// Search the user's rooms. A query without terms matches nothing.
    pub async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: Option<i64>,
    ) -> ChatResult<Vec<MessageSearchHit>> {
        let terms = search_terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let limit = Validator::search_limit(limit, &self.config) as usize;
        let prefilter: Vec<&str> = terms
            .iter()
            .map(String::as_str)
            .filter(|term| term.is_ascii())
            .collect();

        // Every candidate is scored; a later batch can hold an older hit
        // that outranks the current best.
        let mut best = Vec::new();
        let mut offset = 0;
        loop {
            let batch = self
                .messages
                .search_candidates(user_id, &prefilter, SEARCH_BATCH_SIZE, offset)
                .await?;
            let fetched = batch.len() as i64;

            best.extend(batch);
            best = rank_hits(best, &terms, limit);

            if fetched < SEARCH_BATCH_SIZE {
                break;
            }
            offset += fetched;
        }

        Ok(best)
    }

    pub async fn stats(&self, user_id: &str) -> ChatResult<Option<UserMessageStats>> {
        self.messages.user_stats(user_id).await
    }
}
