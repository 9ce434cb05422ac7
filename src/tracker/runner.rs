use chrono::{DateTime, Utc};
use std::future::Future;
use tracing::{info, warn};

use crate::api::RankSource;
use crate::config::Settings;
use crate::ladder::Ladder;
use crate::models::{PlayerKey, PlayerScoreState, Result};
use crate::tracker::PlayerRow;
use crate::tracking::{DeltaTracker, FlushReport, SnapshotGuard, SnapshotStore};

/// Result of one polling cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub rows: Vec<PlayerRow>,
    pub warnings: Vec<String>,
    pub refreshed_at: DateTime<Utc>,
}

impl CycleReport {
    pub fn unavailable_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.available).count()
    }
}

/// Drives polling cycles for every tracked player.
///
/// Owns the snapshot store through a [`SnapshotGuard`], so the store is
/// written when the tracker is shut down or dropped.
pub struct RankTracker<S: RankSource> {
    source: S,
    ladder: Ladder,
    players: Vec<PlayerKey>,
    snapshots: SnapshotGuard,
    deltas: DeltaTracker,
    progress_width: usize,
}

impl<S: RankSource> RankTracker<S> {
    pub fn new(
        source: S,
        ladder: Ladder,
        players: Vec<PlayerKey>,
        snapshots: SnapshotStore,
        progress_width: usize,
    ) -> Self {
        Self {
            source,
            ladder,
            players,
            snapshots: SnapshotGuard::new(snapshots),
            deltas: DeltaTracker::new(),
            progress_width,
        }
    }

    /// Build the ladder and load snapshots from settings. A bad rank scale
    /// fails here, before any player is fetched.
    pub fn from_settings(settings: &Settings, source: S) -> Result<Self> {
        let ladder = Ladder::build(&settings.rank_scale()?);
        let snapshots = SnapshotStore::load(&settings.tracker.snapshot_path)?;

        info!(
            "Tracking {} players on a {}-step ladder",
            settings.players.len(),
            ladder.len()
        );

        Ok(Self::new(
            source,
            ladder,
            settings.player_keys(),
            snapshots,
            settings.tracker.progress_width,
        ))
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    pub fn players(&self) -> &[PlayerKey] {
        &self.players
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub async fn refresh(&mut self) -> CycleReport {
        self.refresh_at(Utc::now()).await
    }

    /// Fetch and recompute every player. A player whose feed cannot be used
    /// gets an unavailable row; the rest of the cycle carries on.
    pub async fn refresh_at(&mut self, now: DateTime<Utc>) -> CycleReport {
        let mut rows = Vec::with_capacity(self.players.len());
        let mut warnings = Vec::new();

        for (i, key) in self.players.iter().enumerate() {
            let index = i + 1;
            match fetch_state(&self.source, key).await {
                Ok(mut state) => {
                    let delta = self.deltas.observe(&mut self.snapshots, &mut state, now);
                    rows.push(PlayerRow::from_state(
                        index,
                        &state,
                        &self.ladder,
                        delta,
                        self.progress_width,
                        now,
                    ));
                }
                Err(e) => {
                    warn!("Player {} unavailable this cycle: {}", key, e);
                    warnings.push(format!("{}: {}", key, e));
                    rows.push(PlayerRow::unavailable(index, key));
                }
            }
        }

        self.deltas.end_cycle();

        CycleReport {
            rows,
            warnings,
            refreshed_at: now,
        }
    }

    /// Run a cycle unless `cancel` completes first. Players observed before
    /// the cancellation keep their snapshot updates, so a following
    /// [`shutdown`](Self::shutdown) still persists them.
    pub async fn refresh_until<F>(&mut self, cancel: F) -> Option<CycleReport>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            report = self.refresh() => Some(report),
            _ = cancel => {
                warn!("Polling cycle interrupted");
                None
            }
        }
    }

    /// Persist snapshots and consume the tracker.
    pub fn shutdown(self) -> Result<FlushReport> {
        self.snapshots.finish()
    }
}

async fn fetch_state<S: RankSource>(source: &S, key: &PlayerKey) -> Result<PlayerScoreState> {
    let response = source.fetch(key).await?;
    PlayerScoreState::from_bridge(key, response)
}
