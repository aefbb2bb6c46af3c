use ratatui::style::{Color, Modifier, Style};

/// Fixed colour theme for the chat surface.
#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    pub panel_color: Color,

    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub model_prefix_style: Style,
    pub model_text_style: Style,
    pub code_block_style: Style,
    pub error_style: Style,

    // Chrome
    pub title_style: Style,
    pub header_name_style: Style,
    pub header_description_style: Style,
    pub sidebar_item_style: Style,
    pub sidebar_description_style: Style,
    pub sidebar_active_style: Style,
    pub sidebar_cursor_style: Style,
    pub disclaimer_style: Style,
    pub empty_state_title_style: Style,
    pub empty_state_text_style: Style,
    pub starter_button_style: Style,
    pub loading_indicator_style: Style,
    pub border_style: Style,
    pub focused_border_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_placeholder_style: Style,
    pub input_disabled_style: Style,
    pub input_cursor_style: Style,
    pub input_cursor_line_style: Style,
}

const SLATE_900: Color = Color::Rgb(15, 23, 42);
const SLATE_800: Color = Color::Rgb(30, 41, 59);
const SLATE_700: Color = Color::Rgb(51, 65, 85);
const SLATE_600: Color = Color::Rgb(71, 85, 105);
const SLATE_500: Color = Color::Rgb(100, 116, 139);
const SLATE_400: Color = Color::Rgb(148, 163, 184);
const SLATE_200: Color = Color::Rgb(226, 232, 240);
const SLATE_100: Color = Color::Rgb(241, 245, 249);
const SKY_400: Color = Color::Rgb(56, 189, 248);
const SKY_500: Color = Color::Rgb(14, 165, 233);
const RED_300: Color = Color::Rgb(252, 165, 165);

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: SLATE_900,
            panel_color: SLATE_800,

            user_prefix_style: Style::default().fg(SKY_400).add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(SKY_400),
            model_prefix_style: Style::default().fg(SLATE_400).add_modifier(Modifier::BOLD),
            model_text_style: Style::default().fg(SLATE_200),
            code_block_style: Style::default().fg(SLATE_100).bg(Color::Rgb(11, 17, 32)),
            error_style: Style::default().fg(RED_300).add_modifier(Modifier::BOLD),

            title_style: Style::default().fg(SKY_400).add_modifier(Modifier::BOLD),
            header_name_style: Style::default().fg(SLATE_100).add_modifier(Modifier::BOLD),
            header_description_style: Style::default().fg(SLATE_400),
            sidebar_item_style: Style::default().fg(SLATE_100),
            sidebar_description_style: Style::default().fg(SLATE_400),
            sidebar_active_style: Style::default()
                .fg(SKY_400)
                .bg(SLATE_700)
                .add_modifier(Modifier::BOLD),
            sidebar_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            disclaimer_style: Style::default().fg(SLATE_500),
            empty_state_title_style: Style::default().fg(SLATE_200).add_modifier(Modifier::BOLD),
            empty_state_text_style: Style::default().fg(SLATE_500),
            starter_button_style: Style::default()
                .fg(Color::White)
                .bg(SKY_500)
                .add_modifier(Modifier::BOLD),
            loading_indicator_style: Style::default().fg(SKY_400),
            border_style: Style::default().fg(SLATE_700),
            focused_border_style: Style::default().fg(SKY_500),

            input_text_style: Style::default().fg(SLATE_100),
            input_placeholder_style: Style::default().fg(SLATE_500),
            input_disabled_style: Style::default().fg(SLATE_600),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_cursor_line_style: Style::default(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}
