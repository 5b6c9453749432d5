//! Progress persistence
//!
//! A single versioned JSON document holds everything that survives a reload:
//! - Current level index
//! - Best completion times
//! - Settings
//! - Last piece placement per level id
//!
//! Loading never fails the game: a missing, unreadable or corrupt document
//! yields fresh progress.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::best_times::BestTimes;
use crate::platform::{Storage, StorageError};
use crate::settings::Settings;
use crate::sim::Snapshot;

/// Storage key of the progress document
pub const STORAGE_KEY: &str = "mirror-maze-progress-v1";

/// Current document version
pub const PROGRESS_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to encode progress: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Everything persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progress {
    pub version: u32,
    pub current_level_index: usize,
    pub best_times: BestTimes,
    pub settings: Settings,
    /// Keyed by level id (not index)
    pub placements: BTreeMap<u32, Snapshot>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            version: PROGRESS_VERSION,
            current_level_index: 0,
            best_times: BestTimes::new(),
            settings: Settings::default(),
            placements: BTreeMap::new(),
        }
    }
}

impl Progress {
    /// Load progress, falling back to defaults on any failure
    pub fn load(storage: &dyn Storage) -> Self {
        let json = match storage.get_item(STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return Self::default(),
            Err(e) => {
                log::warn!("Unable to read progress: {}", e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Progress>(&json) {
            Ok(progress) if progress.version <= PROGRESS_VERSION => {
                log::info!(
                    "Loaded progress: level {}, {} levels completed",
                    progress.current_level_index.saturating_add(1),
                    progress.best_times.completed()
                );
                progress
            }
            Ok(progress) => {
                log::warn!(
                    "Ignoring progress from newer version {}",
                    progress.version
                );
                Self::default()
            }
            Err(e) => {
                log::warn!("Discarding corrupt progress: {}", e);
                Self::default()
            }
        }
    }

    /// Write progress to storage
    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(self)?;
        storage.set_item(STORAGE_KEY, &json)?;
        Ok(())
    }

    /// Remove the stored document
    pub fn clear(storage: &mut dyn Storage) -> Result<(), PersistenceError> {
        storage.remove_item(STORAGE_KEY)?;
        log::info!("Progress cleared");
        Ok(())
    }

    pub fn placement(&self, level_id: u32) -> Option<&Snapshot> {
        self.placements.get(&level_id)
    }

    pub fn set_placement(&mut self, level_id: u32, snapshot: Snapshot) {
        self.placements.insert(level_id, snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;
    use crate::sim::{PieceKind, PieceRecord};

    fn sample() -> Progress {
        let mut progress = Progress {
            current_level_index: 2,
            ..Default::default()
        };
        progress.best_times.record(0, 12.5);
        progress.settings.sound = true;
        progress.set_placement(
            4,
            Snapshot(vec![PieceRecord {
                id: 9,
                kind: PieceKind::Splitter,
                x: 300.0,
                y: 400.0,
                angle: 0.5,
            }]),
        );
        progress
    }

    #[test]
    fn test_missing_document_gives_defaults() {
        let storage = MemoryStorage::new();
        assert_eq!(Progress::load(&storage), Progress::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        let progress = sample();
        progress.save(&mut storage).unwrap();
        assert_eq!(Progress::load(&storage), progress);
    }

    #[test]
    fn test_document_layout() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["currentLevelIndex"], 2);
        assert_eq!(json["bestTimes"], serde_json::json!([12.5]));
        assert_eq!(json["settings"]["sound"], true);
        assert_eq!(json["placements"]["4"][0]["type"], "splitter");
    }

    #[test]
    fn test_corrupt_document_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "{ definitely not json").unwrap();
        assert_eq!(Progress::load(&storage), Progress::default());

        storage
            .set_item(STORAGE_KEY, r#"{ "version": 99, "currentLevelIndex": 3 }"#)
            .unwrap();
        assert_eq!(Progress::load(&storage).current_level_index, 0);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(STORAGE_KEY, r#"{ "currentLevelIndex": 1, "settings": { "reducedMotion": true } }"#)
            .unwrap();
        let progress = Progress::load(&storage);
        assert_eq!(progress.current_level_index, 1);
        assert!(progress.settings.reduced_motion);
        assert!(progress.placements.is_empty());
        assert_eq!(progress.version, PROGRESS_VERSION);
    }

    #[test]
    fn test_clear() {
        let mut storage = MemoryStorage::new();
        sample().save(&mut storage).unwrap();
        Progress::clear(&mut storage).unwrap();
        assert_eq!(storage.get_item(STORAGE_KEY).unwrap(), None);
    }
}
