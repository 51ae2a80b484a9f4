//! Per-user statistics endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use parley_chats::UserMessageStats;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, GatewayResult};
use crate::middleware::CurrentUser;
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatsResponse {
    pub total_messages: i64,
    pub rooms_participated: i64,
    pub first_message_at: String,
    pub last_message_at: String,
    pub most_active_room_id: Option<String>,
    pub most_active_room_name: Option<String>,
    pub messages_in_most_active_room: i64,
}

impl From<UserMessageStats> for UserStatsResponse {
    fn from(stats: UserMessageStats) -> Self {
        Self {
            total_messages: stats.total_messages,
            rooms_participated: stats.rooms_participated,
            first_message_at: stats.first_message_at,
            last_message_at: stats.last_message_at,
            most_active_room_id: stats.most_active_room_id,
            most_active_room_name: stats.most_active_room_name,
            messages_in_most_active_room: stats.messages_in_most_active_room,
        }
    }
}

pub fn create_stats_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/me/stats", get(my_stats))
}

#[utoipa::path(
    get,
    path = "/api/me/stats",
    tag = "Stats",
    responses(
        (status = 200, description = "Message statistics, or null when the caller has written nothing", body = UserStatsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn my_stats(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
) -> GatewayResult<Json<Option<UserStatsResponse>>> {
    let stats = state.message_service.stats(&user.id).await?;
    Ok(Json(stats.map(Into::into)))
}
