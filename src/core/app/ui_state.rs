use crate::core::message::Message;
use crate::ui::theme::Theme;
use ratatui::prelude::Size;
use std::collections::VecDeque;
use std::time::Instant;
use tui_textarea::{CursorMove, TextArea};

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiFocus {
    /// Persona list (navigating and selecting).
    Sidebar,

    /// Message composer.
    Input,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub messages: VecDeque<Message>,
    textarea: TextArea<'static>,
    input_enabled: bool,
    pub theme: Theme,
    pub sidebar_visible: bool,
    pub sidebar_cursor: usize,
    pub sidebar_breakpoint: u16,
    pub focus: UiFocus,
    /// Rows scrolled up from the bottom of the transcript. Zero follows the
    /// newest message.
    pub scroll_offset: u16,
    pub pulse_start: Instant,
    pub exit_requested: bool,
    pub last_term_size: Size,
}

impl UiState {
    pub(crate) fn new(theme: Theme, sidebar_breakpoint: u16) -> Self {
        let mut ui = Self {
            messages: VecDeque::new(),
            textarea: TextArea::default(),
            input_enabled: true,
            theme,
            sidebar_visible: true,
            sidebar_cursor: 0,
            sidebar_breakpoint,
            focus: UiFocus::Input,
            scroll_offset: 0,
            pulse_start: Instant::now(),
            exit_requested: false,
            last_term_size: Size::default(),
        };
        ui.configure_textarea(String::new(), true);
        ui
    }

    pub fn is_narrow(&self, width: u16) -> bool {
        width < self.sidebar_breakpoint
    }

    /// Re-evaluate sidebar visibility for a new terminal width. Wide terminals
    /// always show it, narrow ones always hide it.
    pub fn apply_terminal_size(&mut self, size: Size) {
        self.last_term_size = size;
        self.sidebar_visible = !self.is_narrow(size.width);
        if !self.sidebar_visible && self.focus == UiFocus::Sidebar {
            self.focus = UiFocus::Input;
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
        self.focus = if self.sidebar_visible {
            UiFocus::Sidebar
        } else {
            UiFocus::Input
        };
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            UiFocus::Sidebar => UiFocus::Input,
            UiFocus::Input if self.sidebar_visible => UiFocus::Sidebar,
            UiFocus::Input => UiFocus::Input,
        };
    }

    pub fn focus_input(&mut self) {
        self.focus = UiFocus::Input;
    }

    pub fn is_input_focused(&self) -> bool {
        self.focus == UiFocus::Input
    }

    pub fn is_sidebar_focused(&self) -> bool {
        self.focus == UiFocus::Sidebar
    }

    pub fn move_sidebar_cursor(&mut self, delta: isize, persona_count: usize) {
        if persona_count == 0 {
            return;
        }
        let len = persona_count as isize;
        let next = (self.sidebar_cursor as isize + delta).rem_euclid(len);
        self.sidebar_cursor = next as usize;
    }

    pub fn get_input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn has_multiline_draft(&self) -> bool {
        self.textarea.lines().len() > 1
    }

        pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    /// Replace the draft, putting the cursor at its end.
    pub fn set_input_text(&mut self, text: String) {
        let placeholder = self.textarea.placeholder_text().to_string();
        let enabled = self.input_enabled;
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
        self.configure_textarea(placeholder, enabled);
    }

    pub fn clear_input(&mut self) {
        self.set_input_text(String::new());
    }

    pub fn insert_into_input(&mut self, text: &str) {
        self.textarea.insert_str(text);
    }

    pub fn apply_textarea_edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        f(&mut self.textarea);
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Restyle the composer for the active persona and the pending state.
    pub fn configure_textarea(&mut self, placeholder: String, enabled: bool) {
        self.input_enabled = enabled;
        let text_style = if enabled {
            self.theme.input_text_style
        } else {
            self.theme.input_disabled_style
        };
        self.textarea.set_style(text_style);
        self.textarea.set_placeholder_text(placeholder);
        self.textarea
            .set_placeholder_style(self.theme.input_placeholder_style);
        self.textarea.set_cursor_line_style(self.theme.input_cursor_line_style);
        // A hidden cursor signals that typing is ignored.
        self.textarea.set_cursor_style(if enabled {
            self.theme.input_cursor_style
        } else {
            text_style
        });
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn reset_pulse(&mut self) {
        self.pulse_start = Instant::now();
    }
}
