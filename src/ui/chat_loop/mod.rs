//! Main chat event loop
//!
//! Owns the terminal for the lifetime of an interactive session and feeds
//! keyboard, paste, resize and reply events into the app's action queue.

mod event_loop;
mod keybindings;
mod lifecycle;
pub mod setup;

pub use event_loop::run_chat;
pub use setup::ChatOptions;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::app::App;

/// Shared handle to the app state. All access goes through short closures so
/// the lock is never held across an await.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(inner: Arc<Mutex<App>>) -> Self {
        Self { inner }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
