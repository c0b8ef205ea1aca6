//! In-memory scan log with rescan deduplication.
//!
//! A badge tapped twice in quick succession should not trigger a second
//! decision (or a second remote update), and a denied attendee who comes
//! back after the window should get a fresh decision. Only the most recent
//! matching entry inside the window governs.

use chrono::{DateTime, Duration, Local};

use crate::model::ScanRecord;

/// Default rescan deduplication window.
pub fn default_dedup_window() -> Duration {
    Duration::seconds(60)
}

/// Transient log of resolved scans. Never persisted.
#[derive(Debug)]
pub struct ScanLog {
    entries: Vec<ScanRecord>,
    window: Duration,
}

impl Default for ScanLog {
    fn default() -> Self {
        Self::new(default_dedup_window())
    }
}

impl ScanLog {
    pub fn new(window: Duration) -> Self {
        Self {
            entries: Vec::new(),
            window,
        }
    }

    /// The most recent entry for `identifier` scanned within the dedup
    /// window ending at `now`. Older entries are ignored entirely.
    pub fn recall(&self, identifier: &str, now: DateTime<Local>) -> Option<&ScanRecord> {
        self.entries
            .iter()
            .rev()
            .find(|r| r.identifier == identifier)
            .filter(|r| now.signed_duration_since(r.at) < self.window)
    }

    pub fn push(&mut self, record: ScanRecord) {
        self.entries.push(record);
    }

    /// Most recent entries first, for the status panel.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &ScanRecord> {
        self.entries.iter().rev().take(limit)
    }

    pub fn last(&self) -> Option<&ScanRecord> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScanOutcome;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 2, 16, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn record(id: &str, at: DateTime<Local>) -> ScanRecord {
        ScanRecord {
            identifier: id.into(),
            outcome: ScanOutcome::Approved {
                slot: "fri-lunch".into(),
            },
            at,
        }
    }

    #[test]
    fn recalls_within_window() {
        let mut log = ScanLog::default();
        log.push(record("x", t(0)));
        assert!(log.recall("x", t(30)).is_some());
        assert!(log.recall("y", t(30)).is_none());
    }

    #[test]
    fn window_expiry_forces_fresh_decision() {
        let mut log = ScanLog::default();
        log.push(record("x", t(0)));
        assert!(log.recall("x", t(59)).is_some());
        assert!(log.recall("x", t(60)).is_none());
        assert!(log.recall("x", t(90)).is_none());
    }

    #[test]
    fn most_recent_matching_entry_governs() {
        let mut log = ScanLog::default();
        log.push(record("x", t(0)));
        let mut denied = record("x", t(45));
        denied.outcome = ScanOutcome::AlreadyUsed {
            slot: "fri-lunch".into(),
        };
        log.push(denied);

        // At t=70 the first entry is stale but the second still governs.
        let hit = log.recall("x", t(70)).expect("second entry in window");
        assert_eq!(
            hit.outcome,
            ScanOutcome::AlreadyUsed {
                slot: "fri-lunch".into()
            }
        );
    }

    #[test]
    fn recent_is_newest_first() {
        let mut log = ScanLog::default();
        log.push(record("a", t(0)));
        log.push(record("b", t(1)));
        log.push(record("c", t(2)));
        let ids: Vec<_> = log.recent(2).map(|r| r.identifier.clone()).collect();
        assert_eq!(ids, ["c", "b"]);
    }
}
