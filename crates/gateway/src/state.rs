//! Shared application state for the gateway

use parley_auth::Authenticator;
use parley_chats::{MemberService, MessageService, RoomService};
use parley_config::{AppConfig, RoomsConfig};
use sqlx::SqlitePool;

use crate::error::{GatewayError, GatewayResult};

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    pub authenticator: Authenticator,
    pub room_service: RoomService,
    pub member_service: MemberService,
    pub message_service: MessageService,
    pub rooms_config: RoomsConfig,
}

impl GatewayState {
    /// Create a new gateway state with all services initialized
    pub fn new(pool: SqlitePool, authenticator: Authenticator, rooms_config: RoomsConfig) -> Self {
        Self {
            room_service: RoomService::new(pool.clone(), rooms_config.clone()),
            member_service: MemberService::new(pool.clone()),
            message_service: MessageService::new(pool.clone(), rooms_config.clone()),
            pool,
            authenticator,
            rooms_config,
        }
    }

    /// Open and migrate the configured database, then build the state on top of it
    pub async fn from_config(config: &AppConfig) -> GatewayResult<Self> {
        let pool = parley_database::initialize_database(&config.database)
            .await
            .map_err(|e| GatewayError::DatabaseError(format!("Failed to initialize database: {}", e)))?;

        let authenticator = Authenticator::new(pool.clone(), config.auth.clone());
        Ok(Self::new(pool, authenticator, config.rooms.clone()))
    }
}
