use std::collections::VecDeque;

use ratatui::text::{Line, Span};

use super::segment::{segment, SegmentKind};
use super::theme::Theme;
use crate::core::message::Message;
use crate::core::text_wrapping::{TextWrapper, WrapConfig};
use crate::utils::logging::USER_PREFIX;

/// Columns the message body is indented under its role label.
pub const BODY_INDENT: usize = 2;
const CODE_GUTTER: &str = "│ ";

/// Layout configuration used by the layout engine.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    pub width: usize,
    /// Label shown above model replies, normally the persona name.
    pub model_label: String,
}

/// Mapping for a single message's contribution to the flattened line stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageLineSpan {
    pub start: usize,
    pub len: usize,
}

/// Result of a layout pass: prewrapped lines plus where each message landed.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub lines: Vec<Line<'static>>,
    pub message_spans: Vec<MessageLineSpan>,
}

pub struct LayoutEngine;

impl LayoutEngine {
    /// Lay out the transcript at a fixed width. Every returned line fits the
    /// width, so the renderer must not wrap again.
    pub fn layout_messages(
        messages: &VecDeque<Message>,
        theme: &Theme,
        cfg: &LayoutConfig,
    ) -> Layout {
        let mut lines = Vec::new();
        let mut message_spans = Vec::with_capacity(messages.len());

        for msg in messages {
            let start = lines.len();
            lines.push(Self::role_line(msg, theme, cfg));
            Self::push_body(&mut lines, &msg.text, msg.is_user(), theme, cfg.width);
            lines.push(Line::default());
            message_spans.push(MessageLineSpan {
                start,
                len: lines.len() - start,
            });
        }

        Layout {
            lines,
            message_spans,
        }
    }

    fn role_line(msg: &Message, theme: &Theme, cfg: &LayoutConfig) -> Line<'static> {
        if msg.is_user() {
            Line::from(Span::styled(USER_PREFIX.to_string(), theme.user_prefix_style))
        } else {
            Line::from(Span::styled(cfg.model_label.clone(), theme.model_prefix_style))
        }
    }

    fn push_body(
        lines: &mut Vec<Line<'static>>,
        text: &str,
        is_user: bool,
        theme: &Theme,
        width: usize,
    ) {
        let indent = " ".repeat(BODY_INDENT);
        let text_style = if is_user {
            theme.user_text_style
        } else {
            theme.model_text_style
        };
        let prose_width = WrapConfig::new(width.saturating_sub(BODY_INDENT));
        let code_width = WrapConfig::new(width.saturating_sub(BODY_INDENT + CODE_GUTTER.len()));

        for seg in segment(text) {
            match seg.kind {
                SegmentKind::Plain => {
                    for row in TextWrapper::wrap_lines(&seg.content, &prose_width) {
                        if row.is_empty() {
                            lines.push(Line::default());
                            continue;
                        }
                        lines.push(Line::from(vec![
                            Span::raw(indent.clone()),
                            Span::styled(row, text_style),
                        ]));
                    }
                }
                SegmentKind::Code => {
                    for row in TextWrapper::wrap_lines(&seg.content, &code_width) {
                        lines.push(Line::from(vec![
                            Span::raw(indent.clone()),
                            Span::styled(CODE_GUTTER, theme.code_block_style),
                            Span::styled(row, theme.code_block_style),
                        ]));
                    }
                }
            }
        }
    }
}
