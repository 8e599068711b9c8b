//! Win/loss tally
//!
//! Persisted in the key-value store next to the settings.

use serde::{Deserialize, Serialize};

use crate::persistence::{KEY_TIMES_LOST, KEY_TIMES_WON, KeyValueStore, StoreError};
use crate::settings::read_count;
use crate::sim::Outcome;

/// Lifetime results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub times_won: u32,
    pub times_lost: u32,
}

impl ScoreBoard {
    /// Load from a store; unreadable counters start at zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        Self {
            times_won: read_count(store, KEY_TIMES_WON).unwrap_or(0),
            times_lost: read_count(store, KEY_TIMES_LOST).unwrap_or(0),
        }
    }

    /// Total encounters decided
    pub fn played(&self) -> u32 {
        self.times_won.saturating_add(self.times_lost)
    }

    /// Bump the counter for `outcome` and write it back
    pub fn record(
        &mut self,
        outcome: Outcome,
        store: &mut impl KeyValueStore,
    ) -> Result<(), StoreError> {
        let (key, counter) = match outcome {
            Outcome::Won => (KEY_TIMES_WON, &mut self.times_won),
            Outcome::Lost => (KEY_TIMES_LOST, &mut self.times_lost),
        };
        *counter = counter.saturating_add(1);
        store.set_int(key, i64::from(*counter))?;
        log::info!("Recorded {} ({} won, {} lost)", outcome.tag(), self.times_won, self.times_lost);
        Ok(())
    }

    /// Zero both counters in the store
    pub fn reset(&mut self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        *self = Self::default();
        store.set_int(KEY_TIMES_WON, 0)?;
        store.set_int(KEY_TIMES_LOST, 0)?;
        Ok(())
    }
}
