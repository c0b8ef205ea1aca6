//! Application core — event loop, scan handling, worker dispatch.
//!
//! The evaluator (and its scan log) lives on a dedicated worker task;
//! the UI task feeds it identifiers over a channel and receives resolved
//! scans back. That keeps the event loop non-blocking while a check-in
//! round-trips to the backend, without sharing mutable state.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{info, warn};

use mealgate_core::{
    CoreError, Evaluator, HttpHistoryStore, MealWindows, ScanCapture, ScanEvent, ScanKey,
    ScanResolution, SlotCode,
};

use crate::event::{Event, EventReader};
use crate::tui::Tui;
use crate::ui;

/// How many resolved scans the status panel keeps around.
const RECENT_LIMIT: usize = 50;

/// Messages from the evaluator worker back to the UI.
#[derive(Debug)]
pub enum Action {
    Resolved(Box<ScanResolution>),
    Failed(String),
    AccessDenied(u16),
}

/// Top-level application state and event loop.
pub struct App {
    pub capture: ScanCapture,
    pub windows: MealWindows,
    /// Resolved scans, newest first.
    pub recent: VecDeque<ScanResolution>,
    /// Inline error from the last failed operation, if any.
    pub error: Option<String>,
    /// Set once the backend refuses access; scanning stays off after this.
    pub access_denied: Option<u16>,
    /// Scans submitted but not yet resolved.
    pub pending: usize,
    /// Whether the terminal currently has focus.
    pub focused: bool,
    /// Active slot, recomputed on every tick.
    pub current_slot: Option<SlotCode>,
    running: bool,
    scan_tx: mpsc::UnboundedSender<String>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    /// Create the app and spawn the evaluator worker.
    pub fn new(evaluator: Evaluator<HttpHistoryStore>, windows: MealWindows) -> Self {
        let (scan_tx, scan_rx) = mpsc::unbounded_channel();
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        spawn_worker(evaluator, scan_rx, action_tx);

        let current_slot = windows.current_slot(Local::now().naive_local());
        Self {
            capture: ScanCapture::new(),
            windows,
            recent: VecDeque::new(),
            error: None,
            access_denied: None,
            pending: 0,
            focused: true,
            current_slot,
            running: true,
            scan_tx,
            action_rx,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(Duration::from_millis(250));
        info!("station event loop started");

        while self.running {
            tokio::select! {
                Some(event) = events.next() => self.handle_event(event),
                Some(action) = self.action_rx.recv() => self.handle_action(action),
                else => break,
            }

            tui.draw(|frame| ui::render(frame, self))?;
        }

        events.stop();
        tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::FocusGained => {
                self.focused = true;
                self.capture.resume();
            }
            Event::FocusLost => {
                self.focused = false;
                self.capture.pause();
            }
            Event::Tick => {
                self.current_slot = self.windows.current_slot(Local::now().naive_local());
            }
            Event::Resize(_, _) => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // App controls first; everything else belongs to the wedge buffer.
        match key.code {
            KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
                return;
            }
            KeyCode::F(2) => {
                self.toggle_scanning();
                return;
            }
            KeyCode::Char('q') if !self.capture.is_enabled() => {
                self.running = false;
                return;
            }
            _ => {}
        }

        let Some(scan_key) = map_key(key) else {
            return;
        };
        if let Some(event) = self.capture.push_key(scan_key) {
            match event {
                ScanEvent::Submitted { identifier } => self.submit(identifier),
                ScanEvent::Unreadable { raw } => {
                    warn!(raw, "unreadable scan payload");
                    self.error = Some(format!("Unreadable scan: {raw}"));
                }
            }
        }
    }

    fn toggle_scanning(&mut self) {
        if self.access_denied.is_some() {
            return;
        }
        self.error = None;
        let enabled = self.capture.toggle();
        info!(enabled, "scanning toggled");
    }

    fn submit(&mut self, identifier: String) {
        self.error = None;
        self.pending += 1;
        // Worker gone means we're shutting down anyway.
        let _ = self.scan_tx.send(identifier);
    }

    fn handle_action(&mut self, action: Action) {
        self.pending = self.pending.saturating_sub(1);
        match action {
            Action::Resolved(resolution) => {
                self.error = None;
                self.recent.push_front(*resolution);
                self.recent.truncate(RECENT_LIMIT);
            }
            Action::Failed(message) => {
                self.error = Some(message);
            }
            Action::AccessDenied(status) => {
                self.access_denied = Some(status);
                self.capture.disable();
            }
        }
    }
}

/// Translate a terminal keypress into a capture key.
///
/// Modifier-only and navigation keys map to `Modifier` (filtered by the
/// capture machine); chords like Ctrl+X are dropped entirely.
fn map_key(key: KeyEvent) -> Option<ScanKey> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }
    match key.code {
        KeyCode::Enter => Some(ScanKey::Enter),
        KeyCode::Char(c) => Some(ScanKey::Char(c)),
        KeyCode::Tab | KeyCode::CapsLock | KeyCode::Modifier(_) => Some(ScanKey::Modifier),
        _ => None,
    }
}

/// Worker task: owns the evaluator, resolves identifiers one at a time.
fn spawn_worker(
    mut evaluator: Evaluator<HttpHistoryStore>,
    mut scan_rx: mpsc::UnboundedReceiver<String>,
    action_tx: mpsc::UnboundedSender<Action>,
) {
    tokio::spawn(async move {
        while let Some(identifier) = scan_rx.recv().await {
            let action = match evaluator.scan(&identifier, Local::now()).await {
                Ok(resolution) => Action::Resolved(Box::new(resolution)),
                Err(CoreError::AccessDenied { status }) => Action::AccessDenied(status),
                Err(err) => Action::Failed(err.to_string()),
            };
            if action_tx.send(action).is_err() {
                break;
            }
        }
    });
}
