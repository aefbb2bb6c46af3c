use std::sync::Arc;

use crate::core::persona::{Persona, PersonaCatalog};
use crate::core::session::ChatBackend;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

pub mod actions;
pub mod conversation;
pub mod session;
pub mod ui_state;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionContext, AppActionDispatcher,
    AppActionEnvelope, AppCommand,
};
pub use conversation::{ConversationController, SendRequest};
pub use session::{ConversationPhase, SessionContext};
pub use ui_state::{UiFocus, UiState};

/// Configuration parameters for initializing an App
pub struct AppInitConfig {
    pub catalog: PersonaCatalog,
    pub backend: Arc<dyn ChatBackend>,
    /// Persona id to start with; the first catalog entry when unset.
    pub persona: Option<String>,
    pub log_file: Option<String>,
    pub model: String,
    pub sidebar_breakpoint: u16,
}

pub struct App {
    pub catalog: PersonaCatalog,
    pub backend: Arc<dyn ChatBackend>,
    pub session: SessionContext,
    pub ui: UiState,
}

impl App {
    /// Build the app and bind a session to the starting persona. A failed
    /// `open` is not fatal: it shows up as the error banner.
    pub fn new(init_config: AppInitConfig) -> Result<App, Box<dyn std::error::Error>> {
        let AppInitConfig {
            catalog,
            backend,
            persona,
            log_file,
            model,
            sidebar_breakpoint,
        } = init_config;

        let initial = match persona.as_deref() {
            Some(id) => catalog.resolve_index(id)?,
            None => 0,
        };
        let logging = LoggingState::new(log_file)?;

        let mut app = App {
            catalog,
            backend,
            session: SessionContext::new(initial, logging, model),
            ui: UiState::new(Theme::dark_default(), sidebar_breakpoint),
        };
        app.conversation().select_persona(initial);
        Ok(app)
    }

    pub fn conversation(&mut self) -> ConversationController<'_> {
        ConversationController::new(
            &mut self.session,
            &mut self.ui,
            &self.catalog,
            self.backend.as_ref(),
        )
    }

    pub fn active_persona(&self) -> &Persona {
        self.catalog
            .get(self.session.active_persona)
            .unwrap_or_else(|| self.catalog.default_persona())
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.session.is_awaiting_reply()
    }

    pub fn can_submit(&self) -> bool {
        !self.session.is_awaiting_reply() && self.session.has_session()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.session.last_error.as_deref()
    }

    /// The starter prompt is only offered before the first message.
    pub fn starter_prompt_available(&self) -> bool {
        self.ui.messages.is_empty() && self.can_submit()
    }
}

#[cfg(test)]
mod tests;
