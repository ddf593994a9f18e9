//! Offline stand-in for the dialogue runtime.
//!
//! Useful when developing without credentials and in tests that want the
//! whole turn pipeline without network access. Replies are shaped like real
//! runtime payloads so the decode cascade is exercised end-to-end.

use async_trait::async_trait;
use sage_core::{ConversationSession, Result};
use serde_json::json;

use crate::client::DialogueAgent;

/// Canned keyword-matched agent.
#[derive(Debug, Default, Clone)]
pub struct MockDialogueAgent;

impl MockDialogueAgent {
    pub fn new() -> Self {
        Self
    }

    fn reply_for(text: &str) -> &'static str {
        let lowered = text.to_lowercase();
        if lowered.contains("start") || lowered.contains("on") {
            "Press the Power button to start the printer."
        } else if lowered.contains("cancel") || lowered.contains("stop") {
            "Press the Cancel button to stop printing."
        } else if lowered.contains("restart") || lowered.contains("reset") {
            "Press the Restart button to reset the printer."
        } else {
            "I can help you start, cancel, or restart the printer."
        }
    }

    fn wire_reply(message: &str) -> String {
        json!([{ "type": "text", "payload": { "message": message } }]).to_string()
    }
}

#[async_trait]
impl DialogueAgent for MockDialogueAgent {
    async fn launch(&self, _session: &ConversationSession) -> Result<String> {
        Ok(Self::wire_reply(
            "Hello! I'm your printer assistant. How can I help?",
        ))
    }

    async fn interact(&self, _session: &ConversationSession, text: &str) -> Result<String> {
        Ok(Self::wire_reply(Self::reply_for(text)))
    }
}
