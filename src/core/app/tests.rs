use super::*;
use crate::core::message::{Message, Role};
use crate::core::session::{SessionError, INIT_ERROR_BANNER};
use crate::utils::test_utils::{
    create_test_app, create_test_app_with_backend, test_persona, ScriptedBackend,
};
use ratatui::prelude::Size;

const TERM_WIDTH: u16 = 120;
const TERM_HEIGHT: u16 = 40;

fn ctx() -> AppActionContext {
    AppActionContext {
        term_width: TERM_WIDTH,
        term_height: TERM_HEIGHT,
    }
}

fn apply(app: &mut App, action: AppAction) -> Option<AppCommand> {
    apply_action(app, action, ctx())
}

fn expect_send(command: Option<AppCommand>) -> SendRequest {
    match command {
        Some(AppCommand::SendUtterance(request)) => request,
        None => panic!("expected a send command"),
    }
}

/// Run the send the way the event loop would and feed the outcome back.
async fn settle(app: &mut App, request: SendRequest) {
    let action = match request.session.send(&request.utterance).await {
        Ok(text) => AppAction::ReplyReceived {
            request_id: request.request_id,
            text,
        },
        Err(error) => AppAction::ReplyFailed {
            request_id: request.request_id,
            error,
        },
    };
    apply(app, action);
}

fn roles(app: &App) -> Vec<Role> {
    app.ui.messages.iter().map(|m| m.role).collect()
}

#[test]
fn starts_idle_on_the_first_persona() {
    let backend = ScriptedBackend::new();
    let app = create_test_app_with_backend(backend.clone());

    assert_eq!(app.session.active_persona, 0);
    assert_eq!(app.active_persona().id, "study-buddy");
    assert_eq!(app.session.phase, ConversationPhase::Idle);
    assert!(app.ui.messages.is_empty());
    assert!(app.last_error().is_none());
    assert!(app.can_submit());
    assert_eq!(
        backend.opened(),
        vec![app.active_persona().system_instruction.clone()]
    );
}

#[test]
fn initial_persona_can_be_chosen_by_id() {
    let app = App::new(AppInitConfig {
        catalog: crate::core::persona::PersonaCatalog::builtin(),
        backend: std::sync::Arc::new(ScriptedBackend::new()),
        persona: Some("language-tutor".into()),
        log_file: None,
        model: "test-model".into(),
        sidebar_breakpoint: 100,
    })
    .expect("app");
    assert_eq!(app.active_persona().id, "language-tutor");
}

#[test]
fn unknown_initial_persona_is_rejected() {
    let result = App::new(AppInitConfig {
        catalog: crate::core::persona::PersonaCatalog::builtin(),
        backend: std::sync::Arc::new(ScriptedBackend::new()),
        persona: Some("nope".into()),
        log_file: None,
        model: "test-model".into(),
        sidebar_breakpoint: 100,
    });
    let err = result.err().expect("should fail");
    assert!(err.to_string().contains("Persona 'nope' not found"));
}

#[test]
fn selecting_a_persona_resets_log_and_binds_new_instruction() {
    let backend = ScriptedBackend::new();
    let mut app = create_test_app_with_backend(backend.clone());
    app.ui.messages.push_back(Message::user("old"));
    app.ui.messages.push_back(Message::model("reply"));
    app.session.last_error = Some("Error: stale".into());

    apply(&mut app, AppAction::SelectPersona { index: 3 });

    assert_eq!(app.active_persona().id, "exam-prep-quizzer");
    assert!(app.ui.messages.is_empty());
    assert!(app.last_error().is_none());
    let session = app.session.session.as_ref().expect("session");
    assert_eq!(
        session.system_instruction(),
        app.active_persona().system_instruction
    );
    assert_eq!(backend.opened().len(), 2);
}

#[test]
fn reselecting_the_active_persona_still_resets() {
    let backend = ScriptedBackend::new();
    let mut app = create_test_app_with_backend(backend.clone());
    app.ui.messages.push_back(Message::user("hello"));

    apply(&mut app, AppAction::SelectPersona { index: 0 });

    assert!(app.ui.messages.is_empty());
    assert_eq!(backend.opened().len(), 2);
}

#[test]
fn out_of_range_persona_is_ignored() {
    let mut app = create_test_app();
    apply(&mut app, AppAction::SelectPersona { index: 99 });
    assert_eq!(app.session.active_persona, 0);
}

#[test]
fn missing_credential_surfaces_error_and_blocks_submit() {
    let mut app = create_test_app_with_backend(ScriptedBackend::failing_open());

    assert!(app.session.session.is_none());
    assert_eq!(app.last_error(), Some(INIT_ERROR_BANNER));
    assert!(!app.can_submit());
    assert!(!app.starter_prompt_available());

    app.ui.set_input_text("hello".into());
    assert!(apply(&mut app, AppAction::SubmitDraft).is_none());
    assert!(app.ui.messages.is_empty());
    assert_eq!(app.ui.get_input_text(), "hello");
    assert_eq!(app.last_error(), Some(INIT_ERROR_BANNER));
}

#[test]
fn failed_open_on_switch_clears_log_and_keeps_session_absent() {
    let mut app = create_test_app();
    app.ui.messages.push_back(Message::user("hi"));
    app.backend = std::sync::Arc::new(ScriptedBackend::failing_open());

    apply(&mut app, AppAction::SelectPersona { index: 1 });

    assert_eq!(app.session.active_persona, 1);
    assert!(app.ui.messages.is_empty());
    assert!(app.session.session.is_none());
    assert_eq!(app.last_error(), Some(INIT_ERROR_BANNER));
}

#[tokio::test]
async fn successful_send_appends_user_then_model() {
    let backend = ScriptedBackend::new();
    backend.push_reply(Ok("Covalent bonds share electrons.".into()));
    let mut app = create_test_app_with_backend(backend.clone());
    app.ui.set_input_text("What is a covalent bond?".into());

    let request = expect_send(apply(&mut app, AppAction::SubmitDraft));

    assert!(app.is_awaiting_reply());
    assert_eq!(roles(&app), vec![Role::User]);
    assert_eq!(app.ui.get_input_text(), "");
    assert!(!app.ui.input_enabled());

    settle(&mut app, request).await;

    assert!(!app.is_awaiting_reply());
    assert!(app.ui.input_enabled());
    assert_eq!(roles(&app), vec![Role::User, Role::Model]);
    assert_eq!(app.ui.messages[0].text, "What is a covalent bond?");
    assert_eq!(app.ui.messages[1].text, "Covalent bonds share electrons.");
    assert_eq!(backend.sent(), vec!["What is a covalent bond?".to_string()]);
}

#[tokio::test]
async fn failed_send_rolls_back_and_allows_a_retry() {
    let backend = ScriptedBackend::new();
    backend.push_reply(Ok("first answer".into()));
    backend.push_reply(Err(SessionError::request("RESOURCE_EXHAUSTED: quota")));
    let mut app = create_test_app_with_backend(backend.clone());

    let first = expect_send(apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "one".into(),
        },
    ));
    settle(&mut app, first).await;
    let before: Vec<Message> = app.ui.messages.iter().cloned().collect();

    let second = expect_send(apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "two".into(),
        },
    ));
    assert_eq!(app.ui.messages.len(), 3);
    settle(&mut app, second).await;

    let after: Vec<Message> = app.ui.messages.iter().cloned().collect();
    assert_eq!(after, before);
    assert_eq!(app.session.phase, ConversationPhase::Idle);
    assert_eq!(app.last_error(), Some("Error: RESOURCE_EXHAUSTED: quota"));

    let third = expect_send(apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "three".into(),
        },
    ));
    assert!(app.last_error().is_none());
    settle(&mut app, third).await;
    assert_eq!(app.ui.messages.len(), 4);
    assert_eq!(app.ui.messages[3].text, "echo: three");
}

#[tokio::test]
async fn empty_error_message_uses_generic_banner() {
    let backend = ScriptedBackend::new();
    backend.push_reply(Err(SessionError::request("")));
    let mut app = create_test_app_with_backend(backend);

    let request = expect_send(apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "hi".into(),
        },
    ));
    settle(&mut app, request).await;

    assert_eq!(
        app.last_error(),
        Some("Error: An error occurred while fetching the response.")
    );
    assert!(app.ui.messages.is_empty());
}

#[test]
fn blank_input_is_not_submitted() {
    let mut app = create_test_app();
    app.ui.set_input_text("   \n  ".into());
    assert!(apply(&mut app, AppAction::SubmitDraft).is_none());
    assert!(app.ui.messages.is_empty());
    assert!(!app.is_awaiting_reply());
}

#[test]
fn draft_is_sent_untrimmed() {
    let mut app = create_test_app();
    app.ui.set_input_text("  spaced out  ".into());
    let request = expect_send(apply(&mut app, AppAction::SubmitDraft));
    assert_eq!(request.utterance, "  spaced out  ");
    assert_eq!(app.ui.messages[0].text, "  spaced out  ");
}

#[test]
fn only_one_request_is_in_flight() {
    let mut app = create_test_app();
    let first = apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "one".into(),
        },
    );
    assert!(first.is_some());

    let second = apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "two".into(),
        },
    );
    assert!(second.is_none());
    assert!(apply(&mut app, AppAction::TriggerStarterPrompt).is_none());
    assert_eq!(app.ui.messages.len(), 1);
}

#[test]
fn persona_switch_while_awaiting_is_a_no_op() {
    let mut app = create_test_app();
    expect_send(apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "hi".into(),
        },
    ));

    apply(&mut app, AppAction::SelectPersona { index: 2 });

    assert_eq!(app.session.active_persona, 0);
    assert_eq!(app.ui.messages.len(), 1);
    assert!(app.is_awaiting_reply());
}

#[test]
fn stale_reply_is_dropped() {
    let mut app = create_test_app();
    let request = expect_send(apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "hi".into(),
        },
    ));

    apply(
        &mut app,
        AppAction::ReplyReceived {
            request_id: request.request_id + 7,
            text: "late".into(),
        },
    );
    assert_eq!(app.ui.messages.len(), 1);
    assert!(app.is_awaiting_reply());

    apply(
        &mut app,
        AppAction::ReplyReceived {
            request_id: request.request_id,
            text: "on time".into(),
        },
    );
    assert_eq!(app.ui.messages.len(), 2);

    // A duplicate delivery after settling changes nothing.
    apply(
        &mut app,
        AppAction::ReplyFailed {
            request_id: request.request_id,
            error: SessionError::request("dup"),
        },
    );
    assert_eq!(app.ui.messages.len(), 2);
    assert!(app.last_error().is_none());
}

#[tokio::test]
async fn quiz_master_starter_prompt_sends_literal_text() {
    let backend = ScriptedBackend::new();
    backend.push_reply(Ok("Question 1: ...".into()));
    let mut app = create_test_app_with_backend(backend.clone());
    let quiz = app
        .catalog
        .position("exam-prep-quizzer")
        .expect("quizzer persona");
    apply(&mut app, AppAction::SelectPersona { index: quiz });
    let starter = app.active_persona().starter_prompt.clone();
    assert!(app.starter_prompt_available());

    let request = expect_send(apply(&mut app, AppAction::TriggerStarterPrompt));
    assert_eq!(request.utterance, starter);
    settle(&mut app, request).await;

    assert_eq!(backend.sent(), vec![starter.clone()]);
    assert_eq!(roles(&app), vec![Role::User, Role::Model]);
    assert_eq!(app.ui.messages[0].text, starter);
    assert!(!app.starter_prompt_available());
}

#[test]
fn starter_prompt_needs_an_empty_log() {
    let mut app = create_test_app();
    app.ui.messages.push_back(Message::user("hi"));
    app.ui.messages.push_back(Message::model("hello"));
    assert!(apply(&mut app, AppAction::TriggerStarterPrompt).is_none());
}

#[test]
fn starter_prompt_keeps_draft_cleared() {
    let mut app = create_test_app();
    app.ui.set_input_text("half-typed".into());
    expect_send(apply(&mut app, AppAction::TriggerStarterPrompt));
    assert_eq!(app.ui.get_input_text(), "");
}

#[test]
fn placeholder_names_the_active_persona() {
    let mut app = create_test_app();
    assert_eq!(
        app.ui.textarea().placeholder_text(),
        format!("Message {}...", app.active_persona().name)
    );
    apply(&mut app, AppAction::SelectPersona { index: 5 });
    assert_eq!(app.ui.textarea().placeholder_text(), "Message Language Tutor...");
}

#[test]
fn selecting_on_narrow_terminal_hides_sidebar() {
    let mut app = create_test_app();
    apply(
        &mut app,
        AppAction::Resize {
            width: 80,
            height: 30,
        },
    );
    assert!(!app.ui.sidebar_visible);

    apply(&mut app, AppAction::ToggleSidebar);
    assert!(app.ui.sidebar_visible);
    assert!(app.ui.is_sidebar_focused());

    apply(&mut app, AppAction::SidebarMoveDown);
    apply_action(
        &mut app,
        AppAction::SidebarActivate,
        AppActionContext {
            term_width: 80,
            term_height: 30,
        },
    );
    assert_eq!(app.session.active_persona, 1);
    assert!(!app.ui.sidebar_visible);
    assert!(app.ui.is_input_focused());
}

#[test]
fn selecting_on_wide_terminal_keeps_sidebar() {
    let mut app = create_test_app();
    app.ui.apply_terminal_size(Size::new(TERM_WIDTH, TERM_HEIGHT));
    apply(&mut app, AppAction::SelectPersona { index: 4 });
    assert!(app.ui.sidebar_visible);
}

#[test]
fn sidebar_cursor_follows_active_persona_when_opened() {
    let mut app = create_test_app();
    app.ui.apply_terminal_size(Size::new(80, 30));
    apply(&mut app, AppAction::SelectPersona { index: 6 });
    app.ui.sidebar_cursor = 0;
    apply(&mut app, AppAction::ToggleSidebar);
    assert_eq!(app.ui.sidebar_cursor, 6);
}

#[test]
fn sidebar_navigation_wraps_around_catalog() {
    let mut app = create_test_app();
    apply(&mut app, AppAction::SidebarMoveUp);
    assert_eq!(app.ui.sidebar_cursor, app.catalog.len() - 1);
    apply(&mut app, AppAction::SidebarMoveDown);
    assert_eq!(app.ui.sidebar_cursor, 0);
}

#[test]
fn paste_is_ignored_while_awaiting() {
    let mut app = create_test_app();
    expect_send(apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "hi".into(),
        },
    ));
    apply(
        &mut app,
        AppAction::InsertIntoInput {
            text: "pasted".into(),
        },
    );
    assert_eq!(app.ui.get_input_text(), "");
}

#[test]
fn submitting_scrolls_to_newest_message() {
    let mut app = create_test_app();
    app.ui.scroll_up(10);
    expect_send(apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "hi".into(),
        },
    ));
    assert_eq!(app.ui.scroll_offset, 0);
}

#[test]
fn quit_sets_exit_flag() {
    let mut app = create_test_app();
    apply(&mut app, AppAction::Quit);
    assert!(app.ui.exit_requested);
}

#[test]
fn extra_personas_join_the_catalog() {
    let catalog = crate::core::persona::PersonaCatalog::with_extra(&[test_persona("astronomy")])
        .expect("catalog");
    let backend = ScriptedBackend::new();
    let mut app = App::new(AppInitConfig {
        catalog,
        backend: std::sync::Arc::new(backend.clone()),
        persona: Some("astronomy".into()),
        log_file: None,
        model: "test-model".into(),
        sidebar_breakpoint: 100,
    })
    .expect("app");

    assert_eq!(app.active_persona().name, "astronomy bot");
    let request = expect_send(apply(&mut app, AppAction::TriggerStarterPrompt));
    assert_eq!(request.utterance, "Teach me astronomy");
    assert_eq!(backend.opened(), vec!["You are the astronomy tutor.".to_string()]);
}

#[tokio::test]
async fn transcript_log_only_records_committed_exchanges() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chat.log");
    let backend = ScriptedBackend::new();
    backend.push_reply(Err(SessionError::request("boom")));
    backend.push_reply(Ok("Answer".into()));
    let mut app = App::new(AppInitConfig {
        catalog: crate::core::persona::PersonaCatalog::builtin(),
        backend: std::sync::Arc::new(backend),
        persona: Some("homework-helper".into()),
        log_file: Some(path.to_string_lossy().to_string()),
        model: "test-model".into(),
        sidebar_breakpoint: 100,
    })
    .expect("app");

    let failed = expect_send(apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "lost question".into(),
        },
    ));
    settle(&mut app, failed).await;
    let ok = expect_send(apply(
        &mut app,
        AppAction::SubmitMessage {
            message: "kept question".into(),
        },
    ));
    settle(&mut app, ok).await;

    let contents = std::fs::read_to_string(&path).expect("read log");
    assert!(contents.starts_with("## Homework Helper ("));
    assert!(!contents.contains("lost question"));
    assert!(contents.contains("You: kept question\n\nHomework Helper: Answer\n\n"));
}
