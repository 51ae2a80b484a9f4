//! Results produced by server actions.

use serde::{Deserialize, Serialize};

/// Why an action failed. Not part of the serialized result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailure {
    /// No signed-in user.
    Unauthenticated,
    /// The payload did not pass validation.
    InvalidInput,
    /// The target user already belongs to the room.
    AlreadyMember,
    /// A procedure refused the request.
    Rejected,
    /// Storage failed underneath the action.
    Internal,
}

/// Tagged result handed back to the caller of a server action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub error: bool,
    pub message: String,
    #[serde(skip)]
    failure: Option<ActionFailure>,
}

impl ActionResult {
    pub fn failure(kind: ActionFailure, message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            failure: Some(kind),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            failure: None,
        }
    }

    /// `None` for successful results.
    pub fn failure_kind(&self) -> Option<ActionFailure> {
        self.failure
    }
}

/// What an action resolves to: either navigation or a result object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Redirect(String),
    Completed(ActionResult),
}

impl ActionOutcome {
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect(target) => Some(target),
            Self::Completed(_) => None,
        }
    }
}

impl From<ActionResult> for ActionOutcome {
    fn from(result: ActionResult) -> Self {
        Self::Completed(result)
    }
}
