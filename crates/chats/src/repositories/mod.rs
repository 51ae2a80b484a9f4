//! Data access for rooms, memberships and messages.

pub mod member_repository;
pub mod message_repository;
pub mod room_repository;

pub use member_repository::MemberRepository;
pub use message_repository::MessageRepository;
pub use room_repository::RoomRepository;

use sqlx::SqliteConnection;

use crate::types::ChatResult;

pub(crate) async fn room_exists(conn: &mut SqliteConnection, room_id: &str) -> ChatResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM chat_room WHERE id = ?")
        .bind(room_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn user_exists(conn: &mut SqliteConnection, user_id: &str) -> ChatResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM user_profile WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn membership_exists(
    conn: &mut SqliteConnection,
    room_id: &str,
    user_id: &str,
) -> ChatResult<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM chat_room_member WHERE chat_room_id = ? AND member_id = ?",
    )
    .bind(room_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(found.is_some())
}
