//! Conversation turn orchestration.
//!
//! One use case owns the session, the dialogue agent, the highlight
//! controller, and the message surface, and runs each turn as an atomic
//! sequence: append the user's line, interact, decode, derive the intent,
//! drive the highlight. A try-lock gate refuses overlapping turns instead
//! of queueing them, so a new request is only ever issued after the prior
//! one resolved.

use std::sync::Arc;

use sage_core::highlight::HighlightController;
use sage_core::{ConversationSession, MessageSurface, Result, SageError, TargetId, map_intent};
use sage_interaction::{DialogueAgent, decode_response};

const INITIALIZING_NOTICE: &str = "Please wait, the assistant is still getting ready...";
const NO_RESPONSE_NOTICE: &str = "No response received from the assistant.";

/// Drives the conversational assistant overlay.
pub struct AssistantUsecase {
    agent: Arc<dyn DialogueAgent>,
    session: tokio::sync::Mutex<ConversationSession>,
    highlighter: std::sync::Mutex<HighlightController>,
    surface: Arc<dyn MessageSurface>,
}

impl AssistantUsecase {
    pub fn new(
        agent: Arc<dyn DialogueAgent>,
        highlighter: HighlightController,
        surface: Arc<dyn MessageSurface>,
    ) -> Self {
        Self {
            agent,
            session: tokio::sync::Mutex::new(ConversationSession::new()),
            highlighter: std::sync::Mutex::new(highlighter),
            surface,
        }
    }

    /// Initializes server-side conversation state.
    ///
    /// On success the session is marked started and the decoded greeting,
    /// when non-blank, is shown and drives the highlight like any reply.
    /// Transport failures are shown to the user and returned.
    pub async fn launch(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        tracing::info!(target: "assistant", user_id = %session.user_id, "launching conversation");

        match self.agent.launch(&session).await {
            Ok(raw) => {
                session.mark_started();
                self.handle_reply(&raw);
                Ok(())
            }
            Err(err) => {
                self.show_transport_error(&err);
                Err(err)
            }
        }
    }

    /// Runs one conversational turn.
    ///
    /// Refused (with a notice on the surface, no request issued) while the
    /// session is not started or another turn is still in flight. Transport
    /// failures are shown to the user, returned, and leave the highlight
    /// state untouched.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let Ok(session) = self.session.try_lock() else {
            self.surface.append(INITIALIZING_NOTICE, true);
            return Ok(());
        };
        if !session.started {
            self.surface.append(INITIALIZING_NOTICE, true);
            return Ok(());
        }

        self.surface.append(text, false);
        match self.agent.interact(&session, text).await {
            Ok(raw) => {
                self.handle_reply(&raw);
                Ok(())
            }
            Err(err) => {
                self.show_transport_error(&err);
                Err(err)
            }
        }
    }

    /// Starts a new conversation identity: fresh (or supplied) user id,
    /// cleared transcript, all highlights off. The next `launch` rebuilds
    /// server-side state.
    pub async fn reset_conversation(&self, new_user_id: Option<String>) {
        let mut session = self.session.lock().await;
        session.reset(new_user_id);

        self.surface.clear_all();
        self.highlighter.lock().unwrap().deactivate_all();
        self.surface.append(
            &format!("New conversation started with ID: {}", session.user_id),
            true,
        );
        tracing::info!(target: "assistant", user_id = %session.user_id, "conversation reset");
    }

    /// The currently highlighted target, if any.
    pub fn active_target(&self) -> Option<TargetId> {
        self.highlighter.lock().unwrap().active()
    }

    /// The current conversation user id.
    pub async fn user_id(&self) -> String {
        self.session.lock().await.user_id.clone()
    }

    fn handle_reply(&self, raw: &str) {
        let decoded = decode_response(raw);
        if decoded.trim().is_empty() {
            self.surface.append(NO_RESPONSE_NOTICE, true);
            return;
        }

        self.surface.append(&decoded, true);
        self.apply_intent(&decoded);
    }

    fn apply_intent(&self, text: &str) {
        let mut highlighter = self.highlighter.lock().unwrap();
        match map_intent(text) {
            Some(target) => {
                tracing::debug!(target: "assistant", "reply drives highlight: {target}");
                highlighter.activate(target);
            }
            None => {
                tracing::debug!(target: "assistant", "no intent in reply, clearing highlights");
                highlighter.deactivate_all();
            }
        }
    }

    fn show_transport_error(&self, err: &SageError) {
        tracing::error!(target: "assistant", "dialogue request failed: {err}");
        let notice = match err {
            SageError::Transport {
                status_code: Some(code),
                message,
            } => format!("Error: {code} - {message}"),
            other => format!("Error: {other}"),
        };
        self.surface.append(&notice, true);
    }
}
