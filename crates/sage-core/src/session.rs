//! Conversation session domain model.
//!
//! The dialogue runtime keys all conversational state off a user identifier,
//! so the session is little more than that identifier plus a flag recording
//! whether the server-side conversation was launched.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one conversation with the dialogue runtime.
///
/// Created once at startup; the identifier only ever changes through
/// [`ConversationSession::reset`], which also drops the started flag so the
/// next launch rebuilds server-side state from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSession {
    /// User identifier sent to the dialogue runtime.
    pub user_id: String,
    /// Whether the launch request for this identifier has succeeded.
    pub started: bool,
}

impl ConversationSession {
    /// Creates a session with a freshly generated user identifier.
    pub fn new() -> Self {
        Self {
            user_id: fresh_user_id(),
            started: false,
        }
    }

    /// Creates a session with a caller-supplied user identifier.
    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            started: false,
        }
    }

    /// Marks the launch request as having succeeded.
    pub fn mark_started(&mut self) {
        self.started = true;
    }

    /// Starts over with a new identity.
    ///
    /// Adopts `new_user_id` when supplied, otherwise generates a fresh one.
    /// The started flag is cleared either way.
    pub fn reset(&mut self, new_user_id: Option<String>) {
        self.user_id = new_user_id.unwrap_or_else(fresh_user_id);
        self.started = false;
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

fn fresh_user_id() -> String {
    format!("sim_user_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_not_started() {
        let session = ConversationSession::new();
        assert!(!session.started);
        assert!(session.user_id.starts_with("sim_user_"));
    }

    #[test]
    fn test_reset_issues_fresh_id_and_clears_flag() {
        let mut session = ConversationSession::new();
        let old_id = session.user_id.clone();
        session.mark_started();

        session.reset(None);

        assert_ne!(session.user_id, old_id);
        assert!(!session.started);
    }

    #[test]
    fn test_reset_adopts_supplied_id() {
        let mut session = ConversationSession::with_user_id("trainee-7");
        session.mark_started();

        session.reset(Some("trainee-8".to_string()));

        assert_eq!(session.user_id, "trainee-8");
        assert!(!session.started);
    }
}
