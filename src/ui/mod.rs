//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the interaction loop that turns terminal events into app
//!   actions and spawns Gemini requests.
//! - [`renderer`] and [`layout`]: view composition and frame output.
//! - [`segment`]: splitting replies into prose and fenced code.
//! - [`theme`]: colour and style policy.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns domain logic and backend coordination.

pub mod chat_loop;
pub mod layout;
pub mod renderer;
pub mod segment;
pub mod theme;
