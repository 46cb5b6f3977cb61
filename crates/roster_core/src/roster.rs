//! Last-fetched roster plus the creation generation counter.

use std::collections::HashSet;

use shared::domain::{UserId, UserRecord};
use tracing::warn;

#[derive(Debug, Default, Clone)]
pub struct RosterCache {
    records: Vec<UserRecord>,
    generation: u64,
    loaded: bool,
}

impl RosterCache {
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn get(&self, id: &UserId) -> Option<&UserRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Number of creations observed; each change schedules a refetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether any fetch has completed since the cache was last cleared.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn record_created(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Replaces the whole roster with a fetched list. Later entries that repeat
    /// an earlier id are dropped; the count of dropped entries is returned.
    pub fn replace(&mut self, records: Vec<UserRecord>) -> usize {
        let mut seen = HashSet::with_capacity(records.len());
        let total = records.len();
        self.records = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.id.clone());
                if !fresh {
                    warn!(user_id = %record.id, "roster: dropping duplicate id from fetched list");
                }
                fresh
            })
            .collect();
        self.loaded = true;
        total - self.records.len()
    }

    /// Swaps in `record` for the entry with the same id. Absent ids are a no-op.
    pub fn apply_update(&mut self, record: &UserRecord) -> bool {
        match self.records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record.clone();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.loaded = false;
    }
}

#[cfg(test)]
#[path = "tests/roster_tests.rs"]
mod tests;
