use crate::core::app::App;
use crate::core::text_wrapping::{TextWrapper, WrapConfig};
use crate::ui::layout::{LayoutConfig, LayoutEngine, BODY_INDENT};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub const SIDEBAR_WIDTH: u16 = 34;
pub const SIDEBAR_TITLE: &str = "Gemini EDU Bots";
pub const DISCLAIMER: &str = "Disclaimer: This assistant is for learning purposes. Please use it responsibly and maintain academic integrity.";
const EMPTY_TITLE: &str = "Start a conversation!";
const EMPTY_TEXT: &str =
    "Select a persona and ask a question, or try a starter prompt to see how it works.";
const INPUT_HEIGHT: u16 = 3;
const HEADER_HEIGHT: u16 = 3;
const PULSE_FRAMES: [&str; 3] = ["○", "◐", "●"];

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(app.ui.theme.background_color)),
        area,
    );

    let narrow = app.ui.is_narrow(area.width);
    let show_sidebar = app.ui.sidebar_visible;

    let main_area = if show_sidebar && !narrow {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);
        render_sidebar(f, app, columns[0]);
        columns[1]
    } else {
        area
    };

    render_chat_pane(f, app, main_area);

    // Narrow terminals draw the sidebar over the chat instead of beside it.
    if show_sidebar && narrow {
        let overlay = Rect {
            width: SIDEBAR_WIDTH.min(area.width),
            ..area
        };
        f.render_widget(Clear, overlay);
        render_sidebar(f, app, overlay);
    }
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let border_style = if app.ui.is_sidebar_focused() {
        theme.focused_border_style
    } else {
        theme.border_style
    };
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(border_style)
        .style(Style::default().bg(theme.panel_color))
        .title(Span::styled(SIDEBAR_TITLE, theme.title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let disclaimer_height = wrapped_height(DISCLAIMER, inner.width).min(inner.height / 2);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(disclaimer_height)])
        .split(inner);

    let lines = sidebar_lines(app, theme);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[0]);
    f.render_widget(
        Paragraph::new(Span::styled(DISCLAIMER, theme.disclaimer_style))
            .wrap(Wrap { trim: true }),
        rows[1],
    );
}

fn sidebar_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let show_cursor = app.ui.is_sidebar_focused();
    let mut lines = vec![Line::default()];
    for (index, persona) in app.catalog.list_personas().iter().enumerate() {
        let is_active = index == app.session.active_persona;
        let marker = if show_cursor && index == app.ui.sidebar_cursor {
            Span::styled("› ", theme.sidebar_cursor_style)
        } else {
            Span::raw("  ")
        };
        let name_style = if is_active {
            theme.sidebar_active_style
        } else {
            theme.sidebar_item_style
        };
        lines.push(Line::from(vec![
            marker,
            Span::styled(persona.name.clone(), name_style),
        ]));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(persona.description.clone(), theme.sidebar_description_style),
        ]));
        lines.push(Line::default());
    }
    lines
}

fn render_chat_pane(f: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .split(area);

    render_header(f, app, rows[0]);
    if app.ui.messages.is_empty() && !app.is_awaiting_reply() && app.last_error().is_none() {
        render_empty_state(f, app, rows[1]);
    } else {
        render_transcript(f, app, rows[1]);
    }
    render_input(f, app, rows[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let persona = app.active_persona();
    let header = Paragraph::new(vec![
        Line::from(Span::styled(persona.name.clone(), theme.header_name_style)),
        Line::from(Span::styled(
            persona.description.clone(),
            theme.header_description_style,
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style),
    );
    f.render_widget(header, area);
}

fn render_empty_state(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(EMPTY_TITLE, theme.empty_state_title_style)),
        Line::default(),
        Line::from(Span::styled(EMPTY_TEXT, theme.empty_state_text_style)),
        Line::default(),
    ];
    if app.starter_prompt_available() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("Try: \"{}\"", app.active_persona().starter_prompt),
                theme.starter_button_style,
            ),
            Span::styled("  (Ctrl+S)", theme.empty_state_text_style),
        ]));
    }
    f.render_widget(
        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.ui.theme;
    let width = area.width as usize;
    let layout = LayoutEngine::layout_messages(
        &app.ui.messages,
        theme,
        &LayoutConfig {
            width,
            model_label: app.active_persona().name.clone(),
        },
    );
    let mut lines = layout.lines;

    if app.is_awaiting_reply() {
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(BODY_INDENT)),
            Span::styled(pulse_frame(app), theme.loading_indicator_style),
        ]));
    }
    if let Some(error) = app.last_error() {
        for row in TextWrapper::wrap_lines(error, &WrapConfig::new(width)) {
            lines.push(Line::from(Span::styled(row, theme.error_style)));
        }
    }

    // Every line is already wrapped to the pane width.
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_offset = total.saturating_sub(area.height);
    if app.ui.scroll_offset > max_offset {
        app.ui.scroll_offset = max_offset;
    }
    let top = scroll_top(max_offset, app.ui.scroll_offset);
    f.render_widget(Paragraph::new(lines).scroll((top, 0)), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let title = if app.is_awaiting_reply() {
        "Waiting for reply..."
    } else if app.ui.is_sidebar_focused() {
        "↑/↓ choose persona • Enter select • Esc back • Ctrl+B sidebar"
    } else {
        "Enter send • Tab focus • Ctrl+B sidebar • Ctrl+C quit"
    };
    let border_style = if app.ui.is_input_focused() {
        theme.focused_border_style
    } else {
        theme.border_style
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(title, theme.title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(app.ui.textarea(), inner);
}

/// Row of the transcript shown at the top of the viewport. Offsets count up
/// from the bottom so new messages stay in view when the offset is zero.
pub fn scroll_top(max_offset: u16, scroll_offset: u16) -> u16 {
    max_offset - scroll_offset.min(max_offset)
}

fn pulse_frame(app: &App) -> &'static str {
    let elapsed = app.ui.pulse_start.elapsed().as_millis();
    PULSE_FRAMES[((elapsed / 300) % PULSE_FRAMES.len() as u128) as usize]
}

fn wrapped_height(text: &str, width: u16) -> u16 {
    let rows = TextWrapper::count_wrapped_lines(text, &WrapConfig::new(width as usize));
    u16::try_from(rows).unwrap_or(u16::MAX)
}
