use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::{RankTrackerError, Result};

/// Identity of a tracked player. Snapshots are matched on both fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerKey {
    pub nickname: String,
    pub platform: String,
}

impl PlayerKey {
    pub fn new(nickname: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            platform: platform.into(),
        }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.nickname, self.platform)
    }
}

/// The legend a player has selected, with its kill counter when the
/// feed carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityData {
    pub legend: String,
    pub kills: Option<i64>,
}

/// Live state of one player for a single polling cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScoreState {
    pub key: PlayerKey,
    pub api_nickname: String,
    pub level: u32,
    pub raw_score: i64,
    pub reported_rank: String,
    pub reported_division: u32,
    pub is_online: bool,
    pub is_in_game: bool,
    pub party_full: bool,
    pub state_text: String,
    pub activity: Option<ActivityData>,
    pub last_online: Option<DateTime<Utc>>,
}

impl PlayerScoreState {
    /// Build the state from a bridge response. `global.rank` and `realtime`
    /// are required; legend statistics are optional.
    pub fn from_bridge(key: &PlayerKey, response: BridgeResponse) -> Result<Self> {
        if let Some(message) = response.error {
            return Err(RankTrackerError::ApiError {
                player: key.to_string(),
                message,
            });
        }

        let player = key.to_string();
        let global = response
            .global
            .ok_or_else(|| RankTrackerError::missing(&player, "global"))?;
        let rank = global
            .rank
            .ok_or_else(|| RankTrackerError::missing(&player, "global.rank"))?;
        let realtime = response
            .realtime
            .ok_or_else(|| RankTrackerError::missing(&player, "realtime"))?;

        let raw_score = rank
            .rank_score
            .ok_or_else(|| RankTrackerError::missing(&player, "global.rank.rankScore"))?;
        let reported_rank = rank
            .rank_name
            .ok_or_else(|| RankTrackerError::missing(&player, "global.rank.rankName"))?;

        let activity = realtime.selected_legend.as_ref().map(|legend| ActivityData {
            legend: legend.clone(),
            kills: response
                .legends
                .as_ref()
                .and_then(|legends| legends.kills_for(legend)),
        });

        Ok(Self {
            key: key.clone(),
            api_nickname: global.name.unwrap_or_else(|| key.nickname.clone()),
            level: global.level.unwrap_or(0),
            raw_score,
            reported_rank,
            reported_division: rank.rank_div.unwrap_or(0),
            is_online: realtime.is_online == Some(1),
            is_in_game: realtime.is_in_game == Some(1),
            party_full: realtime.party_full == Some(1),
            state_text: realtime
                .current_state_as_text
                .unwrap_or_else(|| "undefined".to_string()),
            activity,
            last_online: None,
        })
    }

    pub fn is_offline(&self) -> bool {
        !self.is_online
    }
}

/// Raw body returned by the ranking bridge endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeResponse {
    #[serde(rename = "Error")]
    pub error: Option<String>,
    pub global: Option<BridgeGlobal>,
    pub realtime: Option<BridgeRealtime>,
    pub legends: Option<BridgeLegends>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeGlobal {
    pub name: Option<String>,
    pub level: Option<u32>,
    pub rank: Option<BridgeRank>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRank {
    pub rank_score: Option<i64>,
    pub rank_name: Option<String>,
    pub rank_div: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRealtime {
    pub is_online: Option<u8>,
    pub is_in_game: Option<u8>,
    pub party_full: Option<u8>,
    pub current_state_as_text: Option<String>,
    pub selected_legend: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeLegends {
    #[serde(default)]
    pub all: HashMap<String, BridgeLegend>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeLegend {
    pub data: Option<Vec<LegendStat>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegendStat {
    pub key: String,
    pub value: serde_json::Value,
}

impl BridgeLegends {
    pub fn kills_for(&self, legend: &str) -> Option<i64> {
        self.all
            .get(legend)?
            .data
            .as_ref()?
            .iter()
            .find(|stat| stat.key == "kills")
            .and_then(|stat| stat.value.as_i64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key() -> PlayerKey {
        PlayerKey::new("Wraithmain", "PC")
    }

    fn bridge(value: serde_json::Value) -> BridgeResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_full_bridge_response() {
        let response = bridge(json!({
            "global": {
                "name": "wraith_main",
                "level": 512,
                "rank": { "rankScore": 6120, "rankName": "Gold", "rankDiv": 3 }
            },
            "realtime": {
                "isOnline": 1,
                "isInGame": 0,
                "partyFull": 0,
                "currentStateAsText": "In lobby",
                "selectedLegend": "Wraith"
            },
            "legends": {
                "all": {
                    "Wraith": {
                        "data": [
                            { "name": "BR Kills", "value": 4211, "key": "kills" }
                        ]
                    }
                }
            }
        }));

        let state = PlayerScoreState::from_bridge(&key(), response).unwrap();
        assert_eq!(state.api_nickname, "wraith_main");
        assert_eq!(state.raw_score, 6120);
        assert_eq!(state.reported_rank, "Gold");
        assert_eq!(state.reported_division, 3);
        assert!(state.is_online);
        assert!(!state.is_in_game);
        assert_eq!(
            state.activity,
            Some(ActivityData { legend: "Wraith".to_string(), kills: Some(4211) })
        );
    }

    #[test]
    fn test_missing_rank_is_reported() {
        let response = bridge(json!({
            "global": { "name": "x", "level": 1 },
            "realtime": { "isOnline": 0 }
        }));

        match PlayerScoreState::from_bridge(&key(), response) {
            Err(RankTrackerError::MissingField { field, .. }) => assert_eq!(field, "global.rank"),
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_legend_stats_keeps_legend() {
        let response = bridge(json!({
            "global": { "rank": { "rankScore": 10, "rankName": "Rookie", "rankDiv": 4 } },
            "realtime": { "selectedLegend": "Bangalore" }
        }));

        let state = PlayerScoreState::from_bridge(&key(), response).unwrap();
        assert_eq!(
            state.activity,
            Some(ActivityData { legend: "Bangalore".to_string(), kills: None })
        );
        assert_eq!(state.api_nickname, "Wraithmain");
    }

    #[test]
    fn test_error_body_becomes_api_error() {
        let response = bridge(json!({ "Error": "Player not found" }));
        assert!(matches!(
            PlayerScoreState::from_bridge(&key(), response),
            Err(RankTrackerError::ApiError { .. })
        ));
    }
}
