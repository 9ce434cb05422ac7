use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{PlayerKey, PlayerScoreState};

/// One persisted record per player, as written to the snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub nickname: String,
    pub platform: String,
    pub data: SnapshotData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    pub score: i64,
    pub rank: String,
    pub division: u32,
    #[serde(default)]
    pub last_online: Option<DateTime<Utc>>,
}

impl PersistedSnapshot {
    pub fn key(&self) -> PlayerKey {
        PlayerKey::new(self.nickname.clone(), self.platform.clone())
    }

    pub fn from_state(state: &PlayerScoreState) -> Self {
        Self {
            nickname: state.key.nickname.clone(),
            platform: state.key.platform.clone(),
            data: SnapshotData {
                score: state.raw_score,
                rank: state.reported_rank.clone(),
                division: state.reported_division,
                last_online: state.last_online,
            },
        }
    }
}
