//! Split message text into prose and fenced code.
//!
//! A fence is three backticks; the first fence after a closed block opens the
//! next one and the nearest following fence closes it. Code contents are
//! trimmed, prose is kept byte-for-byte. An opening fence with no partner is
//! left in the surrounding prose.
//!
//! ```
//! use edubots::ui::segment::{segment, Segment};
//!
//! assert_eq!(
//!     segment("a ```x``` b"),
//!     vec![Segment::plain("a "), Segment::code("x"), Segment::plain(" b")]
//! );
//! ```

use memchr::memmem;

pub const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Plain,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub content: String,
}

impl Segment {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Plain,
            content: content.into(),
        }
    }

    pub fn code(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Code,
            content: content.into(),
        }
    }

    #[inline]
    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }
}

pub fn segment(text: &str) -> Vec<Segment> {
    let finder = memmem::Finder::new(FENCE);
    let mut segments = Vec::new();
    let mut cursor = 0;

    while let Some(open_rel) = finder.find(&text.as_bytes()[cursor..]) {
        let open = cursor + open_rel;
        let body_start = open + FENCE.len();
        let Some(close_rel) = finder.find(&text.as_bytes()[body_start..]) else {
            break;
        };
        let close = body_start + close_rel;

        push_plain(&mut segments, &text[cursor..open]);
        segments.push(Segment::code(text[body_start..close].trim()));
        cursor = close + FENCE.len();
    }

    push_plain(&mut segments, &text[cursor..]);
    segments
}

fn push_plain(segments: &mut Vec<Segment>, piece: &str) {
    if !piece.is_empty() {
        segments.push(Segment::plain(piece));
    }
}
