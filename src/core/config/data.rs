use crate::core::persona::Persona;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Terminal width (in columns) below which the persona sidebar collapses.
pub const DEFAULT_SIDEBAR_BREAKPOINT: u16 = 100;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Gemini model name (e.g., "gemini-2.5-flash")
    pub model: Option<String>,
    /// Base URL of the Gemini REST API, without the `models/...` suffix
    pub base_url: Option<String>,
    /// Persona id selected at startup instead of the first catalog entry
    pub default_persona: Option<String>,
    /// Terminal width below which the sidebar is hidden
    pub sidebar_breakpoint: Option<u16>,
    /// Additional personas appended after the built-in catalog
    #[serde(default)]
    pub personas: Vec<Persona>,
}

impl Config {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn sidebar_breakpoint(&self) -> u16 {
        self.sidebar_breakpoint
            .unwrap_or(DEFAULT_SIDEBAR_BREAKPOINT)
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
