//! Internal utilities for the chat crate.

pub mod permissions;
pub mod search;
pub mod validation;

pub use permissions::PermissionChecker;
pub use validation::{Pagination, Validator};
