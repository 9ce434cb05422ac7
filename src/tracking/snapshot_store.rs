use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::models::{PersistedSnapshot, PlayerKey, PlayerScoreState, Result};

/// Per-player state carried between runs.
///
/// `baseline` holds what was loaded at startup plus players first seen this
/// run; deltas are always computed against it. `latest` holds the most
/// recent observation of each player and is what gets written on flush.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    path: Option<PathBuf>,
    baseline: BTreeMap<PlayerKey, PersistedSnapshot>,
    latest: BTreeMap<PlayerKey, PersistedSnapshot>,
}

/// Outcome of a flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub written: usize,
    pub skipped: usize,
}

impl SnapshotStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file, or one whose contents are not valid
    /// snapshot JSON, yields an empty store. Other I/O errors (permissions,
    /// a directory in the way) are returned.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut store = Self {
            path: Some(path.clone()),
            ..Default::default()
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No snapshot file at {}, starting fresh", path.display());
                return Ok(store);
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Ignoring snapshot file {} that is not UTF-8: {}", path.display(), e);
                return Ok(store);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Vec<PersistedSnapshot>>(&content) {
            Ok(records) => {
                for record in records {
                    store.baseline.insert(record.key(), record);
                }
                info!("Loaded {} snapshots from {}", store.baseline.len(), path.display());
            }
            Err(e) => {
                warn!("Ignoring malformed snapshot file {}: {}", path.display(), e);
            }
        }

        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &PlayerKey) -> Option<&PersistedSnapshot> {
        self.baseline.get(key)
    }

    pub fn contains(&self, key: &PlayerKey) -> bool {
        self.baseline.contains_key(key)
    }

    /// Add a baseline for a player. Existing baselines are never replaced.
    pub fn insert(&mut self, snapshot: PersistedSnapshot) -> bool {
        let key = snapshot.key();
        if self.baseline.contains_key(&key) {
            return false;
        }
        debug!("Inserting baseline snapshot for {}", key);
        self.baseline.insert(key, snapshot);
        true
    }

    /// Remember the latest observation so it is persisted on flush.
    pub fn record(&mut self, state: &PlayerScoreState) {
        self.latest
            .insert(state.key.clone(), PersistedSnapshot::from_state(state));
    }

    /// Last time the player was seen in game, preferring this run's data.
    pub fn last_online(&self, key: &PlayerKey) -> Option<DateTime<Utc>> {
        self.latest
            .get(key)
            .or_else(|| self.baseline.get(key))
            .and_then(|s| s.data.last_online)
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty() && self.latest.is_empty()
    }

    /// Baseline records overlaid with the latest observations.
    pub fn records(&self) -> Vec<PersistedSnapshot> {
        let mut merged = self.baseline.clone();
        for (key, snapshot) in &self.latest {
            merged.insert(key.clone(), snapshot.clone());
        }
        merged.into_values().collect()
    }

    /// Write every record to disk. Records that fail to serialize are
    /// skipped so the rest still get persisted.
    pub fn flush(&self) -> Result<FlushReport> {
        let Some(path) = &self.path else {
            return Ok(FlushReport::default());
        };

        let mut report = FlushReport::default();
        let mut values = Vec::new();
        for record in self.records() {
            match serde_json::to_value(&record) {
                Ok(value) => {
                    values.push(value);
                    report.written += 1;
                }
                Err(e) => {
                    warn!("Skipping snapshot for {}: {}", record.key(), e);
                    report.skipped += 1;
                }
            }
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&values)?)?;
        fs::rename(&tmp, path)?;

        info!("Saved {} snapshots to {}", report.written, path.display());
        Ok(report)
    }
}

/// Owns the store and flushes it exactly once: through [`finish`] on a
/// normal exit, or from `Drop` when the owner unwinds on an error path.
///
/// [`finish`]: SnapshotGuard::finish
#[derive(Debug)]
pub struct SnapshotGuard {
    store: SnapshotStore,
    flushed: bool,
}

impl SnapshotGuard {
    pub fn new(store: SnapshotStore) -> Self {
        Self {
            store,
            flushed: false,
        }
    }

    pub fn finish(mut self) -> Result<FlushReport> {
        self.flushed = true;
        self.store.flush()
    }
}

impl Deref for SnapshotGuard {
    type Target = SnapshotStore;

    fn deref(&self) -> &SnapshotStore {
        &self.store
    }
}

impl DerefMut for SnapshotGuard {
    fn deref_mut(&mut self) -> &mut SnapshotStore {
        &mut self.store
    }
}

impl Drop for SnapshotGuard {
    fn drop(&mut self) {
        if self.flushed {
            return;
        }
        self.flushed = true;
        if let Err(e) = self.store.flush() {
            error!("Failed to save snapshots on exit: {}", e);
        }
    }
}
