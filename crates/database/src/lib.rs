//! Parley Database Crate
//!
//! Connection management and embedded migrations for the SQLite store that
//! backs rooms, members, messages and sessions.

use sqlx::SqlitePool;
use parley_config::DatabaseConfig;

pub mod clock;
pub mod connection;
pub mod errors;
pub mod migrations;

pub use clock::{format_timestamp, now_timestamp};
pub use connection::prepare_database;
pub use errors::{DatabaseError, DatabaseResult};
pub use migrations::run_migrations;

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_database() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 1,
        };

        let pool = initialize_database(&config).await.unwrap();
        (pool, temp_dir)
    }

    #[tokio::test]
    async fn test_database_initialization_creates_schema() {
        let (pool, _temp_dir) = create_test_database().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        for expected in ["chat_room", "chat_room_member", "message", "session", "user_profile"] {
            assert!(
                tables.iter().any(|name| name == expected),
                "missing table {expected}, found {tables:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let (pool, _temp_dir) = create_test_database().await;

        let result: (bool,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert!(result.0);
    }

    #[tokio::test]
    async fn test_membership_requires_existing_room() {
        let (pool, _temp_dir) = create_test_database().await;

        let result = sqlx::query(
            "INSERT INTO chat_room_member (chat_room_id, member_id, created_at) VALUES ('missing', 'nobody', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err(), "foreign keys should reject orphan memberships");
    }
}
