//! REST API endpoints for the gateway

pub mod auth;
pub mod health;
pub mod landing;
pub mod members;
pub mod messages;
pub mod rooms;
pub mod stats;

use std::sync::Arc;

use axum::Router;

use crate::state::GatewayState;

/// Routes mounted under `/api`
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .merge(auth::create_auth_routes())
        .merge(rooms::create_room_routes())
        .merge(members::create_member_routes())
        .merge(messages::create_message_routes())
        .merge(stats::create_stats_routes())
}
