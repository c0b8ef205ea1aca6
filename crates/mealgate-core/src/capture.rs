//! Scan input capture -- the keyboard-wedge state machine.
//!
//! A badge scanner types its payload as ordinary keystrokes and finishes
//! with Enter. This module makes the implicit buffer-until-Enter behavior
//! an explicit `Idle / Accumulating / Submitting` machine, independent of
//! any terminal or UI framework, so it can be unit-tested on plain key
//! values.
//!
//! Pausing (host window lost focus) and disabling (operator toggle) both
//! drop incoming keys without resetting accumulated state.

use std::borrow::Cow;

/// Capture states. `Submitting` exists only for the duration of an Enter
/// keypress: the buffer is parsed, cleared, and the machine returns to
/// `Idle` regardless of parse success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Accumulating,
    Submitting,
}

/// A keypress as the capture machine sees it.
///
/// Modifier keys (Shift, Control, Alt, Meta, CapsLock, Tab) map to
/// [`Modifier`](ScanKey::Modifier) and are filtered out of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKey {
    Char(char),
    Enter,
    Modifier,
}

/// What an Enter keypress produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// The buffer parsed to an attendee identifier.
    Submitted { identifier: String },
    /// The buffer held something, but no identifier could be extracted.
    Unreadable { raw: String },
}

/// The keyboard-wedge capture machine.
#[derive(Debug)]
pub struct ScanCapture {
    state: CaptureState,
    buffer: String,
    enabled: bool,
    paused: bool,
}

impl Default for ScanCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanCapture {
    /// Starts disabled; the operator turns scanning on explicitly.
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            buffer: String::new(),
            enabled: false,
            paused: false,
        }
    }

    /// Flip the scanning toggle. Enabling or disabling discards any
    /// half-accumulated buffer. Returns the new enabled state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.buffer.clear();
        self.state = CaptureState::Idle;
        self.enabled
    }

    /// Force-disable capture, e.g. when the backend revokes access
    /// mid-session. Discards any half-accumulated buffer.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.buffer.clear();
        self.state = CaptureState::Idle;
    }

    /// Host window lost focus: keep state, ignore keys until resumed.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Host window regained focus.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Feed one keypress. Returns an event only on Enter.
    pub fn push_key(&mut self, key: ScanKey) -> Option<ScanEvent> {
        if !self.enabled || self.paused {
            return None;
        }

        match key {
            ScanKey::Modifier => None,
            ScanKey::Char(c) => {
                self.buffer.push(c);
                self.state = CaptureState::Accumulating;
                None
            }
            ScanKey::Enter => {
                self.state = CaptureState::Submitting;
                let raw = std::mem::take(&mut self.buffer);
                self.state = CaptureState::Idle;

                if raw.is_empty() {
                    return None;
                }
                match parse_identifier(&raw) {
                    Some(identifier) => Some(ScanEvent::Submitted { identifier }),
                    None => Some(ScanEvent::Unreadable { raw }),
                }
            }
        }
    }
}

/// Extract an attendee identifier from a scanned payload.
///
/// Badges encode a query-string record (`id=<uuid>&...`); `username` is
/// accepted as an alias to match the manual-entry URL parameter. A bare
/// token with no `=` at all is taken as the identifier itself, since some
/// wedge scanners emit just the code.
fn parse_identifier(raw: &str) -> Option<String> {
    if !raw.contains('=') {
        let trimmed = raw.trim();
        return (!trimmed.is_empty()).then(|| trimmed.to_owned());
    }

    let pairs: Vec<(Cow<'_, str>, Cow<'_, str>)> =
        url::form_urlencoded::parse(raw.as_bytes()).collect();

    for key in ["id", "username"] {
        if let Some((_, value)) = pairs.iter().find(|(k, _)| k == key) {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
