use super::{App, AppAction, AppActionContext, AppCommand};
use ratatui::prelude::Size;

pub(super) fn handle_navigation_action(
    app: &mut App,
    action: AppAction,
    _ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::ToggleSidebar => {
            app.ui.toggle_sidebar();
            if app.ui.sidebar_visible {
                app.ui.sidebar_cursor = app.session.active_persona;
            }
        }
        AppAction::SidebarMoveUp => {
            let count = app.catalog.len();
            app.ui.move_sidebar_cursor(-1, count);
        }
        AppAction::SidebarMoveDown => {
            let count = app.catalog.len();
            app.ui.move_sidebar_cursor(1, count);
        }
        AppAction::ToggleFocus => {
            app.ui.toggle_focus();
            if app.ui.is_sidebar_focused() {
                app.ui.sidebar_cursor = app.session.active_persona;
            }
        }
        AppAction::Resize { width, height } => {
            app.ui.apply_terminal_size(Size::new(width, height));
        }
        AppAction::ScrollUp { lines } => app.ui.scroll_up(lines),
        AppAction::ScrollDown { lines } => app.ui.scroll_down(lines),
        AppAction::InsertIntoInput { text } => {
            if !text.is_empty() && app.ui.input_enabled() {
                app.ui.focus_input();
                app.ui.insert_into_input(&text);
            }
        }
        AppAction::Quit => app.ui.exit_requested = true,
        _ => unreachable!("non-navigation action routed to navigation handler"),
    }
    None
}
