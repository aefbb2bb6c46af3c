//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input is read on a background task and forwarded over a channel.
//! Each loop iteration drains that channel, resolves keys into actions,
//! applies queued actions to the shared [`App`](crate::core::app::App), spawns
//! the sends those actions ask for, and redraws at most once per frame.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::prelude::Size;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::core::app::{
    apply_actions, AppAction, AppActionContext, AppActionDispatcher, AppActionEnvelope, AppCommand,
    SendRequest,
};
use crate::ui::renderer::ui;

use super::keybindings::{KeyContext, KeyRegistry, KeyResult};
use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use super::setup::{bootstrap_app, ChatOptions};
use super::AppHandle;

const MAX_FPS: u64 = 60;
/// Rows outside the transcript: header, input box and their borders.
const CHROME_ROWS: u16 = 6;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
    RequestRedraw,
}

async fn is_exit_requested(app: &AppHandle) -> bool {
    app.read(|app| app.ui.exit_requested).await
}

async fn current_terminal_size(terminal: &SharedTerminal) -> Size {
    let terminal_guard = terminal.lock().await;
    terminal_guard.size().unwrap_or_default()
}

fn action_context(term_size: Size) -> AppActionContext {
    AppActionContext {
        term_width: term_size.width,
        term_height: term_size.height,
    }
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    app.update(|app| terminal_guard.draw(|f| ui(f, app)).map(|_| ()))
        .await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

#[derive(Debug, Default)]
struct EventProcessingOutcome {
    events_processed: bool,
    request_redraw: bool,
    exit_requested: bool,
}

/// How a key press was consumed.
enum KeyRouting {
    Exit,
    /// An action was queued; later keys must wait until it is applied.
    Dispatched,
    Local,
}

/// Drain terminal events until one queues an action. Keys are resolved
/// against the current focus and phase, so anything after a queued action is
/// left for the next iteration, once the action has been applied.
async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    registry: &KeyRegistry,
    dispatcher: &AppActionDispatcher,
    term_size: Size,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome::default();

    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::RequestRedraw => {}
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                match route_keyboard_event(app, registry, dispatcher, key, term_size).await {
                    KeyRouting::Exit => {
                        outcome.exit_requested = true;
                        break;
                    }
                    KeyRouting::Dispatched => break,
                    KeyRouting::Local => {}
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                handle_paste_event(dispatcher, &text, term_size);
                break;
            }
            UiEvent::Crossterm(Event::Resize(width, height)) => {
                dispatcher.dispatch_many(
                    [AppAction::Resize { width, height }],
                    action_context(Size::new(width, height)),
                );
                break;
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    if outcome.events_processed {
        outcome.request_redraw = true;
    }

    outcome
}

async fn route_keyboard_event(
    app: &AppHandle,
    registry: &KeyRegistry,
    dispatcher: &AppActionDispatcher,
    key: KeyEvent,
    term_size: Size,
) -> KeyRouting {
    let context = app
        .read(|app| {
            KeyContext::from_ui(
                app.ui.focus,
                app.is_awaiting_reply(),
                app.ui.has_multiline_draft(),
            )
        })
        .await;
    let page_rows = term_size.height.saturating_sub(CHROME_ROWS);

    match registry.resolve(context, &key, page_rows) {
        KeyResult::Exit => {
            dispatcher.dispatch_many([AppAction::Quit], action_context(term_size));
            KeyRouting::Exit
        }
        KeyResult::Dispatch(action) => {
            dispatcher.dispatch_many([action], action_context(term_size));
            KeyRouting::Dispatched
        }
        KeyResult::TextInput => {
            app.update(|app| {
                app.ui.apply_textarea_edit(|ta| {
                    ta.input(tui_textarea::Input::from(key));
                });
            })
            .await;
            KeyRouting::Local
        }
        KeyResult::NotHandled => KeyRouting::Local,
    }
}

/// Tabs become spaces, carriage returns become newlines, and other control
/// characters are dropped so a paste cannot inject terminal sequences.
pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\t', "    ")
        .replace('\r', "\n")
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

fn handle_paste_event(dispatcher: &AppActionDispatcher, text: &str, term_size: Size) {
    let text = sanitize_pasted_text(text);
    dispatcher.dispatch_many(
        [AppAction::InsertIntoInput { text }],
        action_context(term_size),
    );
}

fn spawn_send(
    request: SendRequest,
    dispatcher: AppActionDispatcher,
    event_tx: mpsc::UnboundedSender<UiEvent>,
) {
    tokio::spawn(async move {
        let SendRequest {
            session,
            utterance,
            request_id,
        } = request;

        debug!(request_id, "sending utterance");
        let action = match session.send(&utterance).await {
            Ok(text) => AppAction::ReplyReceived { request_id, text },
            Err(error) => AppAction::ReplyFailed { request_id, error },
        };

        dispatcher.dispatch_many([action], AppActionContext::default());
        let _ = event_tx.send(UiEvent::RequestRedraw);
    });
}

async fn drain_action_queue(
    app: &AppHandle,
    dispatcher: &AppActionDispatcher,
    event_tx: &mpsc::UnboundedSender<UiEvent>,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(envelope) = action_rx.try_recv() {
        pending.push(envelope);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    for cmd in commands {
        match cmd {
            AppCommand::SendUtterance(request) => {
                spawn_send(request, dispatcher.clone(), event_tx.clone());
            }
        }
    }
    true
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let app = bootstrap_app(options)?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let dispatcher = AppActionDispatcher::new(action_tx);

    let terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx.clone());
    let registry = KeyRegistry::default();

    // Startup counts as a resize so narrow terminals open with the sidebar
    // collapsed.
    let initial_size = current_terminal_size(&terminal).await;
    dispatcher.dispatch_many(
        [AppAction::Resize {
            width: initial_size.width,
            height: initial_size.height,
        }],
        action_context(initial_size),
    );
    info!(
        width = initial_size.width,
        height = initial_size.height,
        "chat loop started"
    );

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;
    let mut indicator_visible = false;
    let mut last_indicator_frame = Instant::now() - frame_duration;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if is_exit_requested(&app).await {
            break 'main_loop Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break 'main_loop Err(err.into());
        }

        let term_size = current_terminal_size(&terminal).await;

        let event_outcome =
            process_ui_events(&app, &mut event_rx, &registry, &dispatcher, term_size).await;

        if event_outcome.exit_requested {
            break 'main_loop Ok(());
        }

        if event_outcome.request_redraw {
            request_redraw = true;
        }

        let actions_applied =
            drain_action_queue(&app, &dispatcher, &event_tx, &mut action_rx).await;
        if actions_applied {
            request_redraw = true;
        }

        let indicator_now = app.read(|app| app.is_awaiting_reply()).await;

        if indicator_now != indicator_visible {
            indicator_visible = indicator_now;
            request_redraw = true;
            if !indicator_now {
                last_indicator_frame = Instant::now() - frame_duration;
            }
        }

        if indicator_now {
            let now = Instant::now();
            if now.duration_since(last_indicator_frame) >= frame_duration {
                request_redraw = true;
                last_indicator_frame = now;
            }
        }

        let idle = !event_outcome.events_processed && !actions_applied && !request_redraw;

        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&terminal).await?;
    info!("chat loop finished");

    result
}
