mod conversation;
mod navigation;

use tokio::sync::mpsc;

use super::App;
use crate::core::app::SendRequest;
use crate::core::session::SessionError;

#[derive(Debug)]
pub enum AppAction {
    SelectPersona {
        index: usize,
    },
    SubmitDraft,
    SubmitMessage {
        message: String,
    },
    TriggerStarterPrompt,
    ReplyReceived {
        request_id: u64,
        text: String,
    },
    ReplyFailed {
        request_id: u64,
        error: SessionError,
    },
    ToggleSidebar,
    SidebarMoveUp,
    SidebarMoveDown,
    SidebarActivate,
    ToggleFocus,
    Resize {
        width: u16,
        height: u16,
    },
    ScrollUp {
        lines: u16,
    },
    ScrollDown {
        lines: u16,
    },
    InsertIntoInput {
        text: String,
    },
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

pub struct AppActionEnvelope {
    pub action: AppAction,
    pub context: AppActionContext,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch_many<I>(&self, actions: I, ctx: AppActionContext)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(AppActionEnvelope {
                action,
                context: ctx,
            });
        }
    }
}

pub enum AppCommand {
    SendUtterance(SendRequest),
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        if let Some(cmd) = apply_action(app, envelope.action, envelope.context) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::SelectPersona { .. }
        | AppAction::SubmitDraft
        | AppAction::SubmitMessage { .. }
        | AppAction::TriggerStarterPrompt
        | AppAction::ReplyReceived { .. }
        | AppAction::ReplyFailed { .. }
        | AppAction::SidebarActivate => conversation::handle_conversation_action(app, action, ctx),

        AppAction::ToggleSidebar
        | AppAction::SidebarMoveUp
        | AppAction::SidebarMoveDown
        | AppAction::ToggleFocus
        | AppAction::Resize { .. }
        | AppAction::ScrollUp { .. }
        | AppAction::ScrollDown { .. }
        | AppAction::InsertIntoInput { .. }
        | AppAction::Quit => navigation::handle_navigation_action(app, action, ctx),
    }
}
