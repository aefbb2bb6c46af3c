use crate::core::session::SharedSession;
use crate::utils::logging::LoggingState;

/// Whether a reply is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    Idle,
    AwaitingReply,
}

/// Backend-facing half of the app state: which persona is active, the
/// session bound to it, and the bookkeeping for the single in-flight request.
pub struct SessionContext {
    pub active_persona: usize,
    pub session: Option<SharedSession>,
    pub phase: ConversationPhase,
    /// Id of the newest request. Replies tagged with any other id are stale.
    pub current_request_id: u64,
    pub last_error: Option<String>,
    pub logging: LoggingState,
    pub model: String,
}

impl SessionContext {
    pub fn new(active_persona: usize, logging: LoggingState, model: String) -> Self {
        Self {
            active_persona,
            session: None,
            phase: ConversationPhase::Idle,
            current_request_id: 0,
            last_error: None,
            logging,
            model,
        }
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.phase == ConversationPhase::AwaitingReply
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Start a new request and return its id.
    pub fn begin_request(&mut self) -> u64 {
        self.current_request_id = self.current_request_id.wrapping_add(1);
        self.phase = ConversationPhase::AwaitingReply;
        self.current_request_id
    }

    /// Settle the outstanding request if `request_id` is the current one.
    pub fn finish_request(&mut self, request_id: u64) -> bool {
        if !self.is_awaiting_reply() || request_id != self.current_request_id {
            return false;
        }
        self.phase = ConversationPhase::Idle;
        true
    }
}
