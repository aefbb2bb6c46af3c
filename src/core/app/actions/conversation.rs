use super::{App, AppAction, AppActionContext, AppCommand};
use ratatui::prelude::Size;

pub(super) fn handle_conversation_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    sync_term_size(app, ctx);

    match action {
        AppAction::SelectPersona { index } => {
            app.conversation().select_persona(index);
            None
        }
        AppAction::SidebarActivate => {
            let index = app.ui.sidebar_cursor;
            app.conversation().select_persona(index);
            None
        }
        AppAction::SubmitDraft => app
            .conversation()
            .submit_draft()
            .map(AppCommand::SendUtterance),
        AppAction::SubmitMessage { message } => app
            .conversation()
            .submit_utterance(message)
            .map(AppCommand::SendUtterance),
        AppAction::TriggerStarterPrompt => app
            .conversation()
            .trigger_starter_prompt()
            .map(AppCommand::SendUtterance),
        AppAction::ReplyReceived { request_id, text } => {
            app.conversation().complete_reply(request_id, text);
            None
        }
        AppAction::ReplyFailed { request_id, error } => {
            app.conversation().fail_reply(request_id, error);
            None
        }
        _ => unreachable!("non-conversation action routed to conversation handler"),
    }
}

/// Actions dispatched from the event loop carry the terminal size they were
/// produced under; replies from spawned tasks carry none.
fn sync_term_size(app: &mut App, ctx: AppActionContext) {
    if ctx.term_width > 0 && ctx.term_height > 0 {
        app.ui.last_term_size = Size::new(ctx.term_width, ctx.term_height);
    }
}
