//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod persona_list;
pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::cli::persona_list::list_personas;
use crate::cli::say::run_say;
use crate::core::config::Config;
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::utils::diagnostics::init_tracing;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "edubots")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal tutor chat with study personas, powered by Gemini")]
#[command(
    long_about = "edubots is a full-screen terminal chat that pairs you with a study persona \
(study buddy, homework helper, exam quizzer and more) backed by the Gemini API.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    Your Gemini API key (API_KEY is read as a fallback)\n\
  EDUBOTS_LOG       Tracing filter; enables the diagnostics log\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  Ctrl+S            Send the persona's starter prompt\n\
  Tab               Switch focus between the persona list and the input\n\
  Ctrl+B            Show or hide the persona list\n\
  Up/Down/PgUp/PgDn Scroll the conversation (Up/Down move the cursor in a\n\
                    multi-line draft; Ctrl+Up/Ctrl+Down always scroll)\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Gemini model to use (defaults to the config file, then gemini-2.5-flash)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Persona id to start with
    #[arg(short = 'p', long, global = true, value_name = "PERSONA")]
    pub persona: Option<String>,

    /// Append the conversation transcript to this file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Write diagnostics to this file (filter with EDUBOTS_LOG)
    #[arg(long, global = true, value_name = "PATH")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List available personas
    Personas,
    /// Send a single prompt and print the reply without the chat interface
    Say {
        /// Prompt text; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        prompt: Vec<String>,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = init_tracing(args.debug_log.clone(), Config::default_diagnostics_log_path())? {
        info!(path = %path.display(), "diagnostics enabled");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    if let Err(e) = runtime.block_on(async_main(args)) {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let Args {
        command,
        model,
        persona,
        log,
        ..
    } = args;

    match command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(ChatOptions { model, persona, log }).await,
        Commands::Personas => list_personas(),
        Commands::Say { prompt } => run_say(prompt, model, persona).await,
    }
}
