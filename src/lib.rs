pub mod models;
pub mod config;
pub mod ladder;
pub mod tracking;
pub mod api;
pub mod tracker;
pub mod tui;

pub use models::{PlayerKey, PlayerScoreState, PersistedSnapshot, RankTrackerError, Result};
pub use config::Settings;
pub use ladder::{Ladder, Progress, RankScale, RankTier};
pub use tracker::{CycleReport, PlayerRow, RankTracker};
