use super::{session::SessionContext, ui_state::UiState};
use crate::core::message::Message;
use crate::core::persona::{Persona, PersonaCatalog};
use crate::core::session::{ChatBackend, SessionError, SharedSession};
use tracing::{debug, info, warn};

/// Everything a spawned task needs to perform one send.
#[derive(Clone)]
pub struct SendRequest {
    pub session: SharedSession,
    pub utterance: String,
    pub request_id: u64,
}

pub struct ConversationController<'a> {
    session: &'a mut SessionContext,
    ui: &'a mut UiState,
    catalog: &'a PersonaCatalog,
    backend: &'a dyn ChatBackend,
}

impl<'a> ConversationController<'a> {
    pub fn new(
        session: &'a mut SessionContext,
        ui: &'a mut UiState,
        catalog: &'a PersonaCatalog,
        backend: &'a dyn ChatBackend,
    ) -> Self {
        Self {
            session,
            ui,
            catalog,
            backend,
        }
    }

    fn active_persona(&self) -> &'a Persona {
        self.catalog
            .get(self.session.active_persona)
            .unwrap_or_else(|| self.catalog.default_persona())
    }

    /// Switch to the persona at `index`, discarding the session and the log.
    ///
    /// Returns `false` when nothing changed: a reply is outstanding or the
    /// index is out of range. Reselecting the active persona still resets.
    pub fn select_persona(&mut self, index: usize) -> bool {
        if self.session.is_awaiting_reply() {
            debug!(index, "persona selection ignored while awaiting a reply");
            return false;
        }
        let Some(persona) = self.catalog.get(index) else {
            warn!(index, "persona index out of range");
            return false;
        };

        self.session.active_persona = index;
        self.session.session = None;
        self.session.last_error = None;
        self.ui.messages.clear();
        self.ui.sidebar_cursor = index;
        self.ui.scroll_to_bottom();

        match self.backend.open(persona) {
            Ok(session) => {
                info!(persona = %persona.id, "chat session ready");
                self.session.session = Some(session);
                if let Err(e) = self.session.logging.log_session_start(&persona.name) {
                    warn!("Failed to write transcript header: {e}");
                }
            }
            Err(err) => {
                warn!(persona = %persona.id, error = %err, "failed to open chat session");
                self.session.last_error = Some(err.banner_text());
            }
        }

        let width = self.ui.last_term_size.width;
        if width > 0 && self.ui.is_narrow(width) {
            self.ui.sidebar_visible = false;
            self.ui.focus_input();
        }

        self.refresh_composer();
        true
    }

    pub fn can_submit(&self) -> bool {
        !self.session.is_awaiting_reply() && self.session.has_session()
    }

    /// Append the user's message optimistically and hand back the send to run.
    pub fn submit_utterance(&mut self, text: String) -> Option<SendRequest> {
        if text.trim().is_empty() || !self.can_submit() {
            return None;
        }
        let session = self.session.session.clone()?;

        self.ui.messages.push_back(Message::user(text.clone()));
        self.ui.clear_input();
        self.session.last_error = None;
        let request_id = self.session.begin_request();
        debug!(request_id, "submitting utterance");

        self.ui.scroll_to_bottom();
        self.ui.reset_pulse();
        self.refresh_composer();

        Some(SendRequest {
            session,
            utterance: text,
            request_id,
        })
    }

    pub fn submit_draft(&mut self) -> Option<SendRequest> {
        let draft = self.ui.get_input_text();
        self.submit_utterance(draft)
    }

    /// Send the persona's starter prompt. Only offered on an empty log.
    pub fn trigger_starter_prompt(&mut self) -> Option<SendRequest> {
        if !self.ui.messages.is_empty() {
            return None;
        }
        let starter = self.active_persona().starter_prompt.clone();
        self.submit_utterance(starter)
    }

    pub fn complete_reply(&mut self, request_id: u64, text: String) -> bool {
        if !self.session.finish_request(request_id) {
            debug!(request_id, "dropping stale reply");
            return false;
        }

        let reply = Message::model(text);
        let persona_name = self.active_persona().name.clone();
        if let Some(user) = self.ui.messages.back().filter(|m| m.is_user()) {
            if let Err(e) = self.session.logging.log_exchange(user, &reply, &persona_name) {
                warn!("Failed to log exchange: {e}");
            }
        }
        self.ui.messages.push_back(reply);

        self.ui.scroll_to_bottom();
        self.refresh_composer();
        true
    }

    /// Roll back the optimistic user message and surface the error.
    pub fn fail_reply(&mut self, request_id: u64, error: SessionError) -> bool {
        if !self.session.finish_request(request_id) {
            debug!(request_id, "dropping stale failure");
            return false;
        }

        warn!(request_id, error = %error, "send failed");
        if self.ui.messages.back().is_some_and(Message::is_user) {
            self.ui.messages.pop_back();
        }
        self.session.last_error = Some(error.banner_text());

        self.ui.scroll_to_bottom();
        self.refresh_composer();
        true
    }

    /// Sync the composer's placeholder and enabled state with the conversation.
    pub fn refresh_composer(&mut self) {
        let placeholder = format!("Message {}...", self.active_persona().name);
        let enabled = !self.session.is_awaiting_reply();
        self.ui.configure_textarea(placeholder, enabled);
    }
}
