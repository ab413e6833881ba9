//! High score tracking
//!
//! The high score is the best combined score (left + right) of any finished
//! match, kept in the key-value store.

use crate::persistence::KvStore;

/// Best combined score seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub value: u32,
}

impl HighScore {
    /// Store key
    pub const STORAGE_KEY: &'static str = "space-cat-pong-high-score";

    /// Load the high score, starting from 0 if missing or unreadable
    pub fn load<S: KvStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<u32>(&json) {
                Ok(value) => {
                    log::info!("Loaded high score {value}");
                    return Self { value };
                }
                Err(e) => log::warn!("Ignoring unreadable high score {json:?}: {e}"),
            },
            Ok(None) => log::info!("No high score found, starting fresh"),
            Err(e) => log::warn!("Could not read high score: {e}"),
        }
        Self::default()
    }

    /// Whether a finished match's combined score beats the record
    pub fn qualifies(&self, total: u32) -> bool {
        total > self.value
    }

    /// Record a finished match's combined score
    ///
    /// Returns true (and persists) only when it beats the current value.
    pub fn record<S: KvStore + ?Sized>(&mut self, total: u32, store: &mut S) -> bool {
        if !self.qualifies(total) {
            return false;
        }
        self.value = total;
        match store.set(Self::STORAGE_KEY, &total.to_string()) {
            Ok(()) => log::info!("New high score {total} saved"),
            Err(e) => log::warn!("New high score {total} not saved: {e}"),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn store_with(value: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set(HighScore::STORAGE_KEY, value).unwrap();
        store
    }

    #[test]
    fn test_lower_total_does_not_update() {
        // 8 + 10 against a record of 18
        let mut store = store_with("18");
        let mut high = HighScore::load(&store);
        assert!(!high.record(8 + 10, &mut store));
        assert_eq!(high.value, 18);
    }

    #[test]
    fn test_higher_total_updates() {
        // 9 + 10 against a record of 15
        let mut store = store_with("15");
        let mut high = HighScore::load(&store);
        assert!(high.record(9 + 10, &mut store));
        assert_eq!(high.value, 19);
    }

    #[test]
    fn test_record_requires_strictly_greater() {
        let mut store = store_with("15");
        let mut high = HighScore::load(&store);
        assert!(!high.record(15, &mut store));
        assert!(!high.record(14, &mut store));
        assert_eq!(store.get(HighScore::STORAGE_KEY).unwrap().as_deref(), Some("15"));
    }

    #[test]
    fn test_record_persists() {
        let mut store = store_with("15");
        let mut high = HighScore::load(&store);
        assert!(high.record(19, &mut store));
        assert_eq!(HighScore::load(&store).value, 19);
    }

    #[test]
    fn test_missing_or_garbage_loads_zero() {
        assert_eq!(HighScore::load(&MemoryStore::new()).value, 0);
        assert_eq!(HighScore::load(&store_with("lots")).value, 0);
    }
}
