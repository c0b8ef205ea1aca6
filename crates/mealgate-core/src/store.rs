//! History store abstraction over the backend's `used_meals` form.
//!
//! The evaluator talks to this trait, not to HTTP, so the decision logic
//! is testable against an in-memory store. Updates are conditional: the
//! caller states which history it read, and the store refuses to write
//! over a copy that has since moved. This turns the blind-overwrite race
//! (two stations approving the same badge at once) into a visible
//! conflict that the evaluator resolves by re-reading.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::error::CoreError;
use crate::model::MealHistory;

use mealgate_api::CheckinClient;

/// Remote (or test) storage for attendee redemption history.
pub trait HistoryStore {
    /// Read the current history for an attendee.
    async fn fetch(&self, identifier: &str) -> Result<MealHistory, CoreError>;

    /// Replace the history with `updated`, but only if the stored copy
    /// still equals `expected`. `CoreError::UpdateConflict` otherwise.
    async fn swap(
        &self,
        identifier: &str,
        expected: &MealHistory,
        updated: &MealHistory,
    ) -> Result<(), CoreError>;
}

// ── HTTP-backed store ───────────────────────────────────────────────

/// `HistoryStore` over the registration backend.
///
/// The backend's PUT is a blind overwrite, so the conditional update is
/// approximated by re-reading and comparing immediately before writing.
/// That narrows the race window to a single round-trip; closing it fully
/// needs a server-side precondition.
pub struct HttpHistoryStore {
    client: CheckinClient,
}

impl HttpHistoryStore {
    pub fn new(client: CheckinClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CheckinClient {
        &self.client
    }
}

impl HistoryStore for HttpHistoryStore {
    async fn fetch(&self, identifier: &str) -> Result<MealHistory, CoreError> {
        let raw = self.client.get_used_meals(identifier).await?;
        Ok(MealHistory::parse(&raw))
    }

    async fn swap(
        &self,
        identifier: &str,
        expected: &MealHistory,
        updated: &MealHistory,
    ) -> Result<(), CoreError> {
        let current = self.fetch(identifier).await?;
        if current != *expected {
            debug!(identifier, "history moved between read and write");
            return Err(CoreError::UpdateConflict {
                identifier: identifier.to_owned(),
            });
        }
        self.client
            .put_used_meals(identifier, &updated.to_string())
            .await?;
        Ok(())
    }
}

// ── In-memory store ─────────────────────────────────────────────────

/// In-memory `HistoryStore` for tests and offline experiments.
///
/// Counts fetches and writes so tests can assert that deduplicated scans
/// never touch the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    histories: Mutex<HashMap<String, String>>,
    fetches: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an attendee's history.
    pub fn insert(&self, identifier: &str, history: &str) {
        self.histories
            .lock()
            .expect("history map poisoned")
            .insert(identifier.to_owned(), history.to_owned());
    }

    /// The raw stored string for an attendee, if any.
    pub fn get(&self, identifier: &str) -> Option<String> {
        self.histories
            .lock()
            .expect("history map poisoned")
            .get(identifier)
            .cloned()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl HistoryStore for MemoryStore {
    async fn fetch(&self, identifier: &str) -> Result<MealHistory, CoreError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let raw = self.get(identifier).unwrap_or_default();
        Ok(MealHistory::parse(&raw))
    }

    async fn swap(
        &self,
        identifier: &str,
        expected: &MealHistory,
        updated: &MealHistory,
    ) -> Result<(), CoreError> {
        let mut map = self.histories.lock().expect("history map poisoned");
        let current = MealHistory::parse(map.get(identifier).map_or("", String::as_str));
        if current != *expected {
            return Err(CoreError::UpdateConflict {
                identifier: identifier.to_owned(),
            });
        }
        self.writes.fetch_add(1, Ordering::Relaxed);
        map.insert(identifier.to_owned(), updated.to_string());
        Ok(())
    }
}
