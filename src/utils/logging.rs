//! Plain-text transcript log enabled with `--log <file>`.
//!
//! Only committed exchanges are written: a user message is logged together
//! with the reply that confirmed it, so a rolled-back submission never reaches
//! the file.

use crate::core::message::Message;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const USER_PREFIX: &str = "You";

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = &log_file {
            test_file_access(path)?;
        }

        Ok(LoggingState {
            is_active: log_file.is_some(),
            file_path: log_file,
        })
    }

    pub fn disabled() -> Self {
        LoggingState {
            file_path: None,
            is_active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active && self.file_path.is_some()
    }

    /// Marks the start of a conversation with a persona.
    pub fn log_session_start(&self, persona_name: &str) -> Result<(), Box<dyn std::error::Error>> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.log_message(&format!("## {persona_name} ({timestamp})"))
    }

    /// Writes a user message and the reply that committed it. The reply is
    /// labelled with the persona that gave it.
    pub fn log_exchange(
        &self,
        user: &Message,
        reply: &Message,
        persona_name: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.log_message(&format!("{USER_PREFIX}: {}", user.text))?;
        self.log_message(&format!("{persona_name}: {}", reply.text))
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_deref().filter(|_| self.is_active) else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }

        // Blank line between entries, matching the on-screen spacing.
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn get_status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (Some(path), true) => format!(
                "active ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
            _ => "disabled".to_string(),
        }
    }
}

fn test_file_access(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn disabled_logging_writes_nothing() {
        let logging = LoggingState::new(None).expect("logging");
        assert!(!logging.is_active());
        logging.log_message("ignored").expect("no-op");
        assert_eq!(logging.get_status_string(), "disabled");
    }

    #[test]
    fn exchange_labels_user_and_persona() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("transcript.log");
        let path_str = path.to_string_lossy().to_string();

        let logging = LoggingState::new(Some(path_str)).expect("logging");
        assert!(logging.is_active());
        logging
            .log_exchange(
                &Message::user("What is a covalent bond?"),
                &Message::model("Atoms share electrons.\nLike H2."),
                "Study Buddy",
            )
            .expect("log");

        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(
            contents,
            "You: What is a covalent bond?\n\nStudy Buddy: Atoms share electrons.\nLike H2.\n\n"
        );
        assert_eq!(logging.get_status_string(), "active (transcript.log)");
    }

    #[test]
    fn session_start_header_names_persona() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("t.log");
        let logging =
            LoggingState::new(Some(path.to_string_lossy().to_string())).expect("logging");

        logging.log_session_start("Language Tutor").expect("log");

        let contents = fs::read_to_string(&path).expect("read");
        assert!(contents.starts_with("## Language Tutor ("));
    }

    #[test]
    fn unwritable_path_is_rejected_up_front() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("t.log");
        assert!(LoggingState::new(Some(path.to_string_lossy().to_string())).is_err());
    }
}
