//! Best-score ledger
//!
//! The best score is a single non-negative integer stored as a decimal string
//! under `consts::BEST_SCORE_KEY`. Storage is injected at construction; if it
//! fails, the ledger keeps tracking the best score in memory for the rest of
//! the session.

use serde::{Deserialize, Serialize};

use crate::consts::BEST_SCORE_KEY;
use crate::persistence::{KeyValueStore, StoreError};

/// Tracks the current session's best score
pub struct ScoreLedger {
    store: Box<dyn KeyValueStore>,
    best: u64,
    /// Storage failed once; stop touching it
    degraded: bool,
}

impl std::fmt::Debug for ScoreLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreLedger")
            .field("best", &self.best)
            .field("degraded", &self.degraded)
            .finish_non_exhaustive()
    }
}

impl ScoreLedger {
    /// Create a ledger and read the persisted best score
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let mut ledger = Self {
            store,
            best: 0,
            degraded: false,
        };
        ledger.reload();
        ledger
    }

    /// Ledger backed by an in-memory store
    pub fn in_memory() -> Self {
        Self::new(Box::new(crate::persistence::MemoryStore::new()))
    }

    /// Re-read the best score at run start.
    ///
    /// Missing, unparsable or corrupt values count as 0. The in-memory value never
    /// goes down, so a stale store cannot erase a best set this session.
    pub fn reload(&mut self) -> u64 {
        if self.degraded {
            return self.best;
        }
        match self.store.get(BEST_SCORE_KEY) {
            Ok(Some(raw)) => match parse_best(&raw) {
                Some(value) => self.best = self.best.max(value),
                None => log::warn!("Ignoring invalid stored best score {raw:?}"),
            },
            Ok(None) => {}
            // Corrupt contents are a bad value, not a dead store; the next
            // write replaces them
            Err(StoreError::Json(e)) => log::warn!("Ignoring unreadable stored best score: {e}"),
            Err(e) => self.degrade(e),
        }
        self.best
    }

    pub fn best_score(&self) -> u64 {
        self.best
    }

    /// True once storage has failed and the best score is memory-only
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Record a finished run; returns true when it set a new best
    pub fn record_run_end(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        log::info!("New best score: {score}");
        if !self.degraded {
            if let Err(e) = self.store.set(BEST_SCORE_KEY, &score.to_string()) {
                self.degrade(e);
            }
        }
        true
    }

    fn degrade(&mut self, err: StoreError) {
        log::warn!("Best score storage unavailable, keeping it in memory only: {err}");
        self.degraded = true;
    }
}

fn parse_best(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

/// Result-screen rating for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Performance {
    /// 0
    Grounded,
    /// 1..=4
    Fledgling,
    /// 5..=9
    Glider,
    /// 10..=19
    HighFlyer,
    /// 20+
    Legend,
}

impl Performance {
    pub fn for_score(score: u64) -> Self {
        match score {
            0 => Performance::Grounded,
            1..=4 => Performance::Fledgling,
            5..=9 => Performance::Glider,
            10..=19 => Performance::HighFlyer,
            _ => Performance::Legend,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Performance::Grounded => "Ouch! Give it another flap.",
            Performance::Fledgling => "Nice start! Keep practicing.",
            Performance::Glider => "Good flying!",
            Performance::HighFlyer => "Great job! You're a natural.",
            Performance::Legend => "Incredible! A true sky legend!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, UnavailableStore};

    #[test]
    fn missing_value_reads_as_zero() {
        let ledger = ScoreLedger::in_memory();
        assert_eq!(ledger.best_score(), 0);
        assert!(!ledger.is_degraded());
    }

    #[test]
    fn invalid_values_read_as_zero() {
        for raw in ["abc", "-4", "", "3.5"] {
            let ledger = ScoreLedger::new(Box::new(MemoryStore::with_entry(BEST_SCORE_KEY, raw)));
            assert_eq!(ledger.best_score(), 0, "raw value {raw:?}");
        }
    }

    #[test]
    fn valid_value_is_loaded() {
        let ledger = ScoreLedger::new(Box::new(MemoryStore::with_entry(BEST_SCORE_KEY, " 42 ")));
        assert_eq!(ledger.best_score(), 42);
    }

    #[test]
    fn only_higher_scores_replace_best() {
        let mut ledger = ScoreLedger::new(Box::new(MemoryStore::with_entry(BEST_SCORE_KEY, "5")));
        assert!(!ledger.record_run_end(3));
        assert!(!ledger.record_run_end(5));
        assert_eq!(ledger.best_score(), 5);
        assert!(ledger.record_run_end(9));
        assert_eq!(ledger.best_score(), 9);
        assert_eq!(ledger.reload(), 9);
    }

    #[test]
    fn unavailable_store_degrades_to_memory() {
        let mut ledger = ScoreLedger::new(Box::new(UnavailableStore));
        assert!(ledger.is_degraded());
        assert_eq!(ledger.best_score(), 0);
        assert!(ledger.record_run_end(4));
        assert_eq!(ledger.reload(), 4);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn corrupt_save_file_is_repaired_by_next_best() {
        use crate::persistence::JsonFileStore;

        let dir = std::env::temp_dir().join(format!("shoppy-bird-ledger-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("save.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut ledger = ScoreLedger::new(Box::new(JsonFileStore::new(&path)));
        assert_eq!(ledger.best_score(), 0);
        assert!(!ledger.is_degraded());
        assert!(ledger.record_run_end(9));
        assert!(!ledger.is_degraded());

        let next_session = ScoreLedger::new(Box::new(JsonFileStore::new(&path)));
        assert_eq!(next_session.best_score(), 9);
        assert!(!next_session.is_degraded());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn performance_buckets() {
        assert_eq!(Performance::for_score(0), Performance::Grounded);
        assert_eq!(Performance::for_score(1), Performance::Fledgling);
        assert_eq!(Performance::for_score(4), Performance::Fledgling);
        assert_eq!(Performance::for_score(5), Performance::Glider);
        assert_eq!(Performance::for_score(9), Performance::Glider);
        assert_eq!(Performance::for_score(10), Performance::HighFlyer);
        assert_eq!(Performance::for_score(19), Performance::HighFlyer);
        assert_eq!(Performance::for_score(20), Performance::Legend);
        assert_eq!(Performance::for_score(500), Performance::Legend);
    }
}
