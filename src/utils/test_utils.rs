use crate::core::app::{App, AppInitConfig};
use crate::core::persona::{Persona, PersonaCatalog};
use crate::core::session::{ChatBackend, ChatSession, SessionError, SharedSession};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Backend double: every session shares one queue of canned replies and one
/// record of what was sent.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    pub fail_open: bool,
    replies: Arc<Mutex<VecDeque<Result<String, SessionError>>>>,
    sent: Arc<Mutex<Vec<String>>>,
    opened: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn push_reply(&self, reply: Result<String, SessionError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Utterances received by any session, in order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// System instructions of every session opened so far.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl ChatBackend for ScriptedBackend {
    fn open(&self, persona: &Persona) -> Result<SharedSession, SessionError> {
        if self.fail_open {
            return Err(SessionError::Initialization(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }
        self.opened
            .lock()
            .unwrap()
            .push(persona.system_instruction.clone());
        Ok(Arc::new(ScriptedSession {
            system_instruction: persona.system_instruction.clone(),
            replies: self.replies.clone(),
            sent: self.sent.clone(),
        }))
    }
}

pub struct ScriptedSession {
    system_instruction: String,
    replies: Arc<Mutex<VecDeque<Result<String, SessionError>>>>,
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ChatSession for ScriptedSession {
    fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    async fn send(&self, utterance: &str) -> Result<String, SessionError> {
        self.sent.lock().unwrap().push(utterance.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {utterance}")))
    }
}

pub fn create_test_app_with_backend(backend: ScriptedBackend) -> App {
    App::new(AppInitConfig {
        catalog: PersonaCatalog::builtin(),
        backend: Arc::new(backend),
        persona: None,
        log_file: None,
        model: "test-model".to_string(),
        sidebar_breakpoint: 100,
    })
    .expect("test app")
}

pub fn create_test_app() -> App {
    create_test_app_with_backend(ScriptedBackend::new())
}

pub fn test_persona(id: &str) -> Persona {
    Persona {
        id: id.to_string(),
        name: format!("{id} bot"),
        description: format!("Helps with {id}"),
        system_instruction: format!("You are the {id} tutor."),
        starter_prompt: format!("Teach me {id}"),
    }
}
