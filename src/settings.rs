//! Encounter settings
//!
//! Persisted as two integers in the key-value store.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BULLET_COUNT, DEFAULT_ENEMY_COUNT};
use crate::persistence::{KEY_BULLET_COUNT, KEY_ENEMY_COUNT, KeyValueStore, StoreError};

/// User-configurable encounter size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Pursuers spawned per encounter
    pub enemy_count: u32,
    /// Magazine capacity
    pub bullet_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enemy_count: DEFAULT_ENEMY_COUNT,
            bullet_count: DEFAULT_BULLET_COUNT,
        }
    }
}

impl Settings {
    /// Parse user-entered values; both must be non-negative integers
    pub fn parse(enemies: &str, bullets: &str) -> Option<Self> {
        let enemy_count = enemies.trim().parse::<u32>().ok()?;
        let bullet_count = bullets.trim().parse::<u32>().ok()?;
        Some(Self {
            enemy_count,
            bullet_count,
        })
    }

    /// Load from a store, falling back to defaults per value
    pub fn load(store: &impl KeyValueStore) -> Self {
        let defaults = Self::default();
        let settings = Self {
            enemy_count: read_count(store, KEY_ENEMY_COUNT).unwrap_or(defaults.enemy_count),
            bullet_count: read_count(store, KEY_BULLET_COUNT).unwrap_or(defaults.bullet_count),
        };
        log::info!(
            "Settings: {} enemies, {} bullets",
            settings.enemy_count,
            settings.bullet_count
        );
        settings
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        store.set_int(KEY_ENEMY_COUNT, i64::from(self.enemy_count))?;
        store.set_int(KEY_BULLET_COUNT, i64::from(self.bullet_count))?;
        log::info!("Settings saved");
        Ok(())
    }
}

/// Stored value as a count; negative or oversized values read as absent
pub(crate) fn read_count(store: &impl KeyValueStore, key: &str) -> Option<u32> {
    let raw = store.get_int(key)?;
    match u32::try_from(raw) {
        Ok(count) => Some(count),
        Err(_) => {
            log::warn!("Ignoring out-of-range value {raw} for {key}");
            None
        }
    }
}
