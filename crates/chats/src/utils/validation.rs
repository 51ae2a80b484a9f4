//! Validation utilities.

use parley_config::RoomsConfig;

use crate::types::{ChatError, ChatResult};

pub const MAX_ROOM_NAME_LENGTH: usize = 100;
pub const MAX_MESSAGE_LENGTH: usize = 4_000;
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Validation utilities
pub struct Validator;

impl Validator {
    /// Validate UUID format
    pub fn uuid(uuid_str: &str) -> ChatResult<()> {
        if uuid_str.trim().is_empty() {
            return Err(ChatError::validation("UUID cannot be empty"));
        }

        uuid::Uuid::parse_str(uuid_str)?;
        Ok(())
    }

    /// Validate a room name, returning it trimmed.
    pub fn room_name(name: &str) -> ChatResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatError::validation("Room name cannot be empty"));
        }

        if name.chars().count() > MAX_ROOM_NAME_LENGTH {
            return Err(ChatError::validation(format!(
                "Room name too long (max {MAX_ROOM_NAME_LENGTH} characters)"
            )));
        }

        Ok(name.to_owned())
    }

    /// Validate message text, returning it trimmed.
    pub fn message_text(text: &str) -> ChatResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::validation("Message text cannot be empty"));
        }

        if text.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(ChatError::validation(format!(
                "Message text too long (max {MAX_MESSAGE_LENGTH} characters)"
            )));
        }

        Ok(text.to_owned())
    }

    /// Clamp a search limit into `1..=MAX_SEARCH_LIMIT`.
    pub fn search_limit(limit: Option<i64>, config: &RoomsConfig) -> i64 {
        limit
            .unwrap_or(config.default_search_limit)
            .clamp(1, MAX_SEARCH_LIMIT)
    }
}

/// A clamped page request for room messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub size: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(size: Option<i64>, offset: Option<i64>, config: &RoomsConfig) -> Self {
        let max = config.max_page_size.max(1);
        Self {
            size: size.unwrap_or(config.default_page_size).clamp(1, max),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None, &RoomsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_name_is_trimmed_and_bounded() {
        assert_eq!(Validator::room_name("  general  ").unwrap(), "general");
        assert!(Validator::room_name("").is_err());
        assert!(Validator::room_name(" \t ").is_err());
        assert!(Validator::room_name(&"x".repeat(MAX_ROOM_NAME_LENGTH)).is_ok());
        assert!(Validator::room_name(&"x".repeat(MAX_ROOM_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn room_name_counts_characters_not_bytes() {
        let name = "é".repeat(MAX_ROOM_NAME_LENGTH);
        assert!(Validator::room_name(&name).is_ok());
    }

    #[test]
    fn message_text_rules() {
        assert_eq!(Validator::message_text(" hi ").unwrap(), "hi");
        assert!(Validator::message_text("   ").is_err());
        assert!(Validator::message_text(&"a".repeat(MAX_MESSAGE_LENGTH + 1)).is_err());
    }

    #[test]
    fn uuid_validation() {
        assert!(Validator::uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(Validator::uuid("not-a-uuid").is_err());
        assert!(Validator::uuid("").is_err());
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        let config = RoomsConfig::default();

        let page = Pagination::new(None, None, &config);
        assert_eq!(page, Pagination { size: 50, offset: 0 });

        let page = Pagination::new(Some(1_000), Some(-5), &config);
        assert_eq!(page, Pagination { size: 100, offset: 0 });

        let page = Pagination::new(Some(0), Some(20), &config);
        assert_eq!(page, Pagination { size: 1, offset: 20 });
    }

    #[test]
    fn search_limit_clamps() {
        let config = RoomsConfig::default();
        assert_eq!(Validator::search_limit(None, &config), 20);
        assert_eq!(Validator::search_limit(Some(0), &config), 1);
        assert_eq!(Validator::search_limit(Some(500), &config), MAX_SEARCH_LIMIT);
    }
}
