//! The redemption evaluator -- ties slot resolution, the scan log, the
//! decision rule, and the history store into the one flow a scan follows:
//!
//! identifier → dedup check → slot → fetch history → decide → (swap) → log

use chrono::{DateTime, Duration, Local};
use tracing::{debug, info};

use crate::decision::{Decision, decide};
use crate::error::CoreError;
use crate::model::{ScanOutcome, ScanRecord, ScanResolution, SlotCode};
use crate::scan_log::ScanLog;
use crate::slots::MealWindows;
use crate::store::HistoryStore;

/// Orchestrates redemption decisions over a history store.
pub struct Evaluator<S> {
    store: S,
    windows: MealWindows,
    log: ScanLog,
}

impl<S: HistoryStore> Evaluator<S> {
    pub fn new(store: S, windows: MealWindows) -> Self {
        Self {
            store,
            windows,
            log: ScanLog::default(),
        }
    }

    /// Override the rescan deduplication window (default 60 seconds).
    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.log = ScanLog::new(window);
        self
    }

    /// The scan log, for rendering recent outcomes.
    pub fn log(&self) -> &ScanLog {
        &self.log
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active slot at `now`, if any.
    pub fn current_slot(&self, now: DateTime<Local>) -> Option<SlotCode> {
        self.windows.current_slot(now.naive_local())
    }

    /// Resolve one badge scan.
    ///
    /// The slot is resolved first: outside every window the scan is a deny
    /// that never enters the log, so a badge tapped just before a window
    /// opens gets a fresh decision once it does. Inside a window, a repeat
    /// scan of the same identifier for the same slot within the dedup
    /// window reuses the previous outcome without touching the store.
    /// Otherwise the history is fetched, the decision computed, and an
    /// approval persisted through the store's conditional update -- with
    /// one retry if the history moved underneath us, which normally
    /// converts the second writer's approval into an `AlreadyUsed` denial.
    pub async fn scan(
        &mut self,
        identifier: &str,
        now: DateTime<Local>,
    ) -> Result<ScanResolution, CoreError> {
        let Some(slot) = self.current_slot(now) else {
            return Ok(ScanResolution {
                record: ScanRecord {
                    identifier: identifier.to_owned(),
                    outcome: ScanOutcome::NoActiveSlot,
                    at: now,
                },
                deduplicated: false,
            });
        };

        if let Some(previous) = self
            .log
            .recall(identifier, now)
            .filter(|r| r.outcome.slot() == Some(&slot))
        {
            debug!(identifier, outcome = previous.outcome.label(), "rescan within window, reusing outcome");
            return Ok(ScanResolution {
                record: previous.clone(),
                deduplicated: true,
            });
        }

        let mut retried = false;
        loop {
            let history = self.store.fetch(identifier).await?;
            match decide(&history, &slot) {
                Decision::AlreadyUsed => {
                    return Ok(self.resolve(
                        identifier,
                        ScanOutcome::AlreadyUsed { slot },
                        now,
                    ));
                }
                Decision::Approved => {
                    let updated = history.with(&slot);
                    match self.store.swap(identifier, &history, &updated).await {
                        Ok(()) => {
                            info!(identifier, slot = %slot, "redemption recorded");
                            return Ok(self.resolve(
                                identifier,
                                ScanOutcome::Approved { slot },
                                now,
                            ));
                        }
                        Err(CoreError::UpdateConflict { .. }) if !retried => {
                            debug!(identifier, "conflicting update, re-reading history");
                            retried = true;
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }
    }

    fn resolve(
        &mut self,
        identifier: &str,
        outcome: ScanOutcome,
        now: DateTime<Local>,
    ) -> ScanResolution {
        let record = ScanRecord {
            identifier: identifier.to_owned(),
            outcome,
            at: now,
        };
        self.log.push(record.clone());
        ScanResolution {
            record,
            deduplicated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MealHistory;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    const X: &str = "702f951f-8719-445d-b277-eaa4ea49dd41";

    /// Friday 12:00 local -- inside the default lunch window.
    fn lunch_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 2, 16, 12, 0, 0).unwrap()
    }

    fn evaluator() -> Evaluator<MemoryStore> {
        Evaluator::new(MemoryStore::new(), MealWindows::default())
    }

    #[tokio::test]
    async fn first_scan_approves_and_persists() {
        let mut eval = evaluator();
        let resolution = eval.scan(X, lunch_time()).await.unwrap();

        assert!(resolution.record.outcome.is_approved());
        assert!(!resolution.deduplicated);
        assert_eq!(eval.store().get(X).as_deref(), Some("fri-lunch"));
    }

    #[tokio::test]
    async fn rescan_at_30s_reuses_without_store_traffic() {
        let mut eval = evaluator();
        eval.scan(X, lunch_time()).await.unwrap();
        let fetches = eval.store().fetch_count();
        let writes = eval.store().write_count();

        let resolution = eval
            .scan(X, lunch_time() + Duration::seconds(30))
            .await
            .unwrap();

        assert!(resolution.deduplicated);
        assert!(resolution.record.outcome.is_approved());
        assert_eq!(eval.store().fetch_count(), fetches, "no second fetch");
        assert_eq!(eval.store().write_count(), writes, "no second update");
    }

    #[tokio::test]
    async fn rescan_at_90s_is_a_fresh_decision_and_denies() {
        let mut eval = evaluator();
        eval.scan(X, lunch_time()).await.unwrap();

        let resolution = eval
            .scan(X, lunch_time() + Duration::seconds(90))
            .await
            .unwrap();

        assert!(!resolution.deduplicated);
        assert_eq!(
            resolution.record.outcome,
            ScanOutcome::AlreadyUsed {
                slot: "fri-lunch".into()
            }
        );
        // denial wrote nothing
        assert_eq!(eval.store().write_count(), 1);
        assert_eq!(eval.store().get(X).as_deref(), Some("fri-lunch"));
    }

    #[tokio::test]
    async fn already_used_slot_denies_without_update() {
        let mut eval = evaluator();
        eval.store().insert(X, "mon-lunch fri-lunch");

        let resolution = eval.scan(X, lunch_time()).await.unwrap();
        assert_eq!(
            resolution.record.outcome,
            ScanOutcome::AlreadyUsed {
                slot: "fri-lunch".into()
            }
        );
        assert_eq!(eval.store().write_count(), 0);
    }

    #[tokio::test]
    async fn outside_windows_is_no_active_slot() {
        let mut eval = evaluator();
        let three_am = Local.with_ymd_and_hms(2024, 2, 16, 3, 0, 0).unwrap();

        let resolution = eval.scan(X, three_am).await.unwrap();
        assert_eq!(resolution.record.outcome, ScanOutcome::NoActiveSlot);
        // nothing fetched, nothing written
        assert_eq!(eval.store().fetch_count(), 0);
        assert_eq!(eval.store().write_count(), 0);
    }

    #[tokio::test]
    async fn scan_before_window_opens_does_not_poison_dedup() {
        let mut eval = evaluator();
        let before = Local.with_ymd_and_hms(2024, 2, 16, 16, 59, 40).unwrap();
        let resolution = eval.scan(X, before).await.unwrap();
        assert_eq!(resolution.record.outcome, ScanOutcome::NoActiveSlot);

        // 30s later the dinner window is open; the same badge must get a
        // fresh decision, not the stale no-slot outcome.
        let after = Local.with_ymd_and_hms(2024, 2, 16, 17, 0, 10).unwrap();
        let resolution = eval.scan(X, after).await.unwrap();
        assert!(!resolution.deduplicated);
        assert_eq!(
            resolution.record.outcome,
            ScanOutcome::Approved {
                slot: "fri-dinner".into()
            }
        );
    }

    #[tokio::test]
    async fn dedup_does_not_cross_a_slot_boundary() {
        let mut eval = evaluator();
        let late_breakfast = Local.with_ymd_and_hms(2024, 2, 16, 10, 59, 50).unwrap();
        let resolution = eval.scan(X, late_breakfast).await.unwrap();
        assert!(resolution.record.outcome.is_approved());

        // 30s later lunch is active; the breakfast approval must not be
        // replayed for the new slot.
        let resolution = eval
            .scan(X, Local.with_ymd_and_hms(2024, 2, 16, 11, 0, 20).unwrap())
            .await
            .unwrap();
        assert!(!resolution.deduplicated);
        assert_eq!(
            resolution.record.outcome,
            ScanOutcome::Approved {
                slot: "fri-lunch".into()
            }
        );
    }

    /// A store where another station slips in a write between our fetch
    /// and our swap, exactly once.
    struct RacyStore {
        inner: MemoryStore,
        raced: std::sync::atomic::AtomicBool,
    }

    impl HistoryStore for RacyStore {
        async fn fetch(&self, identifier: &str) -> Result<MealHistory, CoreError> {
            self.inner.fetch(identifier).await
        }

        async fn swap(
            &self,
            identifier: &str,
            expected: &MealHistory,
            updated: &MealHistory,
        ) -> Result<(), CoreError> {
            if !self.raced.swap(true, std::sync::atomic::Ordering::SeqCst) {
                // the other station records the same slot first
                self.inner.insert(identifier, &updated.to_string());
            }
            self.inner.swap(identifier, expected, updated).await
        }
    }

    #[tokio::test]
    async fn conflicting_update_reresolves_to_denial() {
        let store = RacyStore {
            inner: MemoryStore::new(),
            raced: std::sync::atomic::AtomicBool::new(false),
        };
        let mut eval = Evaluator::new(store, MealWindows::default());

        // Our swap conflicts, the retry re-reads and finds the slot taken.
        let resolution = eval.scan(X, lunch_time()).await.unwrap();
        assert_eq!(
            resolution.record.outcome,
            ScanOutcome::AlreadyUsed {
                slot: "fri-lunch".into()
            }
        );
        // the only write is the simulated other station's
        assert_eq!(eval.store().inner.write_count(), 0);
        assert_eq!(eval.store().inner.get(X).as_deref(), Some("fri-lunch"));
    }

    #[tokio::test]
    async fn different_identifiers_do_not_deduplicate() {
        let mut eval = evaluator();
        eval.scan(X, lunch_time()).await.unwrap();
        let other = eval
            .scan("other-attendee", lunch_time() + Duration::seconds(5))
            .await
            .unwrap();
        assert!(!other.deduplicated);
        assert!(other.record.outcome.is_approved());
    }
}
