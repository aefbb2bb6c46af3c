//! Key routing for the chat screen.
//!
//! Keys resolve to app actions through a small registry keyed by
//! [`KeyContext`]. Resolution is pure: it never touches app state, so the
//! event loop can look up the context once, resolve, then dispatch.

use crate::core::app::{AppAction, UiFocus};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Where keyboard input is currently going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// Composer focused and accepting text.
    Typing,
    /// Like `Typing`, but the draft spans several lines so the arrows move
    /// the cursor instead of scrolling the transcript.
    Drafting,
    /// Composer focused while a reply is outstanding; text is ignored.
    Waiting,
    /// Persona list focused.
    Sidebar,
}

impl KeyContext {
    pub fn from_ui(focus: UiFocus, awaiting_reply: bool, multiline_draft: bool) -> Self {
        match (focus, awaiting_reply, multiline_draft) {
            (UiFocus::Sidebar, _, _) => KeyContext::Sidebar,
            (UiFocus::Input, true, _) => KeyContext::Waiting,
            (UiFocus::Input, false, true) => KeyContext::Drafting,
            (UiFocus::Input, false, false) => KeyContext::Typing,
        }
    }

    fn accepts_text(self) -> bool {
        matches!(self, KeyContext::Typing | KeyContext::Drafting)
    }
}

/// Result of resolving a key event.
#[derive(Debug)]
pub enum KeyResult {
    /// Dispatch this action.
    Dispatch(AppAction),
    /// Quit the loop.
    Exit,
    /// Forward the key to the text area.
    TextInput,
    NotHandled,
}

/// Pattern for matching key events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPattern {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPattern {
    pub fn simple(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code && self.modifiers == key.modifiers
    }
}

/// Which contexts a binding is active in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyScope {
    Global,
    Composer,
    /// Composer bindings that give way to cursor movement in a multi-line draft.
    SingleLine,
    Sidebar,
}

impl KeyScope {
    fn covers(self, context: KeyContext) -> bool {
        match self {
            KeyScope::Global => true,
            KeyScope::Composer => matches!(
                context,
                KeyContext::Typing | KeyContext::Drafting | KeyContext::Waiting
            ),
            KeyScope::SingleLine => matches!(context, KeyContext::Typing | KeyContext::Waiting),
            KeyScope::Sidebar => context == KeyContext::Sidebar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyCommand {
    Quit,
    ToggleSidebar,
    ToggleFocus,
    Submit,
    Newline,
    StarterPrompt,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    SidebarUp,
    SidebarDown,
    SidebarSelect,
}

pub struct KeyRegistry {
    bindings: Vec<(KeyScope, KeyPattern, KeyCommand)>,
}

impl Default for KeyRegistry {
    fn default() -> Self {
        use KeyCommand::*;
        use KeyScope::*;

        let bindings = vec![
            (Global, KeyPattern::ctrl(KeyCode::Char('c')), Quit),
            (Global, KeyPattern::ctrl(KeyCode::Char('q')), Quit),
            (Global, KeyPattern::ctrl(KeyCode::Char('b')), ToggleSidebar),
            (Global, KeyPattern::simple(KeyCode::Tab), ToggleFocus),
            (Global, KeyPattern::simple(KeyCode::PageUp), PageUp),
            (Global, KeyPattern::simple(KeyCode::PageDown), PageDown),
            (Composer, KeyPattern::simple(KeyCode::Enter), Submit),
            (
                Composer,
                KeyPattern::with_modifiers(KeyCode::Enter, KeyModifiers::ALT),
                Newline,
            ),
            (Composer, KeyPattern::ctrl(KeyCode::Char('s')), StarterPrompt),
            (Composer, KeyPattern::ctrl(KeyCode::Up), ScrollUp),
            (Composer, KeyPattern::ctrl(KeyCode::Down), ScrollDown),
            (SingleLine, KeyPattern::simple(KeyCode::Up), ScrollUp),
            (SingleLine, KeyPattern::simple(KeyCode::Down), ScrollDown),
            (Sidebar, KeyPattern::simple(KeyCode::Up), SidebarUp),
            (Sidebar, KeyPattern::simple(KeyCode::Char('k')), SidebarUp),
            (Sidebar, KeyPattern::simple(KeyCode::Down), SidebarDown),
            (Sidebar, KeyPattern::simple(KeyCode::Char('j')), SidebarDown),
            (Sidebar, KeyPattern::simple(KeyCode::Enter), SidebarSelect),
            (Sidebar, KeyPattern::simple(KeyCode::Esc), ToggleFocus),
        ];
        Self { bindings }
    }
}

impl KeyRegistry {
    /// Resolve a key press. `page_rows` is the height of one transcript page.
    pub fn resolve(&self, context: KeyContext, key: &KeyEvent, page_rows: u16) -> KeyResult {
        let command = self
            .bindings
            .iter()
            .find(|(scope, pattern, _)| scope.covers(context) && pattern.matches(key))
            .map(|(_, _, command)| *command);

        match command {
            Some(KeyCommand::Quit) => KeyResult::Exit,
            Some(command) => KeyResult::Dispatch(command_action(command, page_rows)),
            None if context.accepts_text() && is_text_edit(key) => KeyResult::TextInput,
            None => KeyResult::NotHandled,
        }
    }
}

fn command_action(command: KeyCommand, page_rows: u16) -> AppAction {
    let page = page_rows.max(1);
    match command {
        KeyCommand::Quit => AppAction::Quit,
        KeyCommand::ToggleSidebar => AppAction::ToggleSidebar,
        KeyCommand::ToggleFocus => AppAction::ToggleFocus,
        KeyCommand::Submit => AppAction::SubmitDraft,
        KeyCommand::Newline => AppAction::InsertIntoInput {
            text: "\n".to_string(),
        },
        KeyCommand::StarterPrompt => AppAction::TriggerStarterPrompt,
        KeyCommand::ScrollUp => AppAction::ScrollUp { lines: 1 },
        KeyCommand::ScrollDown => AppAction::ScrollDown { lines: 1 },
        KeyCommand::PageUp => AppAction::ScrollUp { lines: page },
        KeyCommand::PageDown => AppAction::ScrollDown { lines: page },
        KeyCommand::SidebarUp => AppAction::SidebarMoveUp,
        KeyCommand::SidebarDown => AppAction::SidebarMoveDown,
        KeyCommand::SidebarSelect => AppAction::SidebarActivate,
    }
}

/// Keys the text area understands. Control chords that fall through the
/// registry are still forwarded so readline-style editing works.
fn is_text_edit(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char(_)
            | KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Home
            | KeyCode::End
    )
}
