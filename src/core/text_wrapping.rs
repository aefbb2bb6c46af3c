//! Word wrapping for the message transcript.
//!
//! Lines are wrapped ahead of rendering so the layout knows exactly how many
//! rows each message occupies. That row count drives scrolling, which ratatui's
//! own `Wrap` cannot report. Spacing inside a line is kept as typed; only the
//! whitespace that falls on a break is dropped.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Configuration for text wrapping behavior
#[derive(Debug, Clone, Copy)]
pub struct WrapConfig {
    /// Maximum width for text lines, in terminal columns
    pub width: usize,
}

impl WrapConfig {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
        }
    }
}

pub struct TextWrapper;

impl TextWrapper {
    /// Wrap text at word boundaries, returning one string per visual row.
    /// Hard line breaks in the input are kept; an empty input is one empty row.
    pub fn wrap_lines(text: &str, config: &WrapConfig) -> Vec<String> {
        let width = config.width.max(1);
        let mut rows = Vec::new();
        for line in text.split('\n') {
            wrap_single_line(line.trim_end_matches('\r'), width, &mut rows);
        }
        rows
    }

    pub fn wrap_text(text: &str, config: &WrapConfig) -> String {
        Self::wrap_lines(text, config).join("\n")
    }

    pub fn count_wrapped_lines(text: &str, config: &WrapConfig) -> usize {
        Self::wrap_lines(text, config).len()
    }
}

fn wrap_single_line(line: &str, width: usize, rows: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;

    for token in tokenize(line) {
        let token_width = UnicodeWidthStr::width(token);
        let is_space = token.starts_with(char::is_whitespace);

        if current_width + token_width <= width {
            current.push_str(token);
            current_width += token_width;
            continue;
        }

        if is_space {
            // The break swallows the whitespace run.
            if current_width > 0 {
                flush(&mut current, &mut current_width, rows);
            }
            continue;
        }

        if current_width > 0 {
            flush(&mut current, &mut current_width, rows);
        }

        if token_width <= width {
            current.push_str(token);
            current_width = token_width;
            continue;
        }

        for ch in token.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && current_width > 0 {
                flush(&mut current, &mut current_width, rows);
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    rows.push(current.trim_end().to_string());
}

fn flush(current: &mut String, current_width: &mut usize, rows: &mut Vec<String>) {
    rows.push(current.trim_end().to_string());
    current.clear();
    *current_width = 0;
}

/// Split into alternating runs of whitespace and non-whitespace.
fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (idx, ch) in line.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                tokens.push(&line[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_space = Some(space);
    }

    if start < line.len() {
        tokens.push(&line[start..]);
    }
    tokens
}
