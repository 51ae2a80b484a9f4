//! Shared types for the chat crate.

pub mod errors;
pub mod responses;

pub use errors::{ChatError, ChatResult};
pub use responses::{ActionFailure, ActionOutcome, ActionResult};
