//! edubots is a full-screen terminal tutor chat backed by the Gemini API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the persona catalog, the Gemini session adapter, and the
//!   conversation controller that applies user actions to app state.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`cli`] parses arguments and dispatches to the chat loop or the one-shot
//!   commands.
//! - [`utils`] holds the transcript logger, diagnostics setup, and URL helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
