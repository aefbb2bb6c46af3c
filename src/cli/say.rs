//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use tracing::info;

use crate::core::session::ChatBackend;
use crate::ui::chat_loop::setup::resolve_startup;
use crate::ui::segment::{segment, SegmentKind};

const CODE_INDENT: &str = "    ";

pub async fn run_say(
    prompt: Vec<String>,
    model: Option<String>,
    persona: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err("Usage: edubots say <prompt>".into());
    }

    let startup = resolve_startup(model, persona)?;
    let index = match startup.persona.as_deref() {
        Some(id) => startup.catalog.resolve_index(id)?,
        None => 0,
    };
    let persona = startup
        .catalog
        .get(index)
        .unwrap_or_else(|| startup.catalog.default_persona());

    info!(persona = %persona.id, "say");
    let session = startup.backend.open(persona)?;
    let reply = session.send(&prompt).await?;

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", format_reply(&reply))?;
    stdout.flush()?;
    Ok(())
}

/// Plain text is printed as-is; code blocks are indented so they stand out
/// without colour.
pub fn format_reply(reply: &str) -> String {
    let mut out = String::new();
    for seg in segment(reply) {
        match seg.kind {
            SegmentKind::Plain => out.push_str(&seg.content),
            SegmentKind::Code => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                for line in seg.content.lines() {
                    out.push_str(CODE_INDENT);
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
