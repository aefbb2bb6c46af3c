pub mod app;
pub mod config;
pub mod gemini;
pub mod message;
pub mod persona;
pub mod session;
pub mod text_wrapping;
