use serde::{Deserialize, Serialize};

use crate::models::{RankTrackerError, Result};

/// A named rank bracket. In configuration files the fields are spelled
/// `score` and `divisions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTier {
    pub name: String,
    #[serde(rename = "score")]
    pub base_score: i64,
    #[serde(rename = "divisions")]
    pub division_count: u32,
}

impl RankTier {
    pub fn new(name: impl Into<String>, base_score: i64, division_count: u32) -> Self {
        Self {
            name: name.into(),
            base_score,
            division_count,
        }
    }
}

/// Validated, immutable ordered tier list. The last tier is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankScale {
    tiers: Vec<RankTier>,
}

impl RankScale {
    pub fn new(tiers: Vec<RankTier>) -> Result<Self> {
        if tiers.len() < 2 {
            return Err(RankTrackerError::ConfigError(format!(
                "Rank scale needs at least 2 tiers, got {}",
                tiers.len()
            )));
        }

        if let Some(tier) = tiers.iter().find(|t| t.division_count < 1) {
            return Err(RankTrackerError::ConfigError(format!(
                "Tier {} must have at least one division",
                tier.name
            )));
        }

        for pair in tiers.windows(2) {
            if pair[1].base_score <= pair[0].base_score {
                return Err(RankTrackerError::ConfigError(format!(
                    "Tier {} starts at {} which is not above {} ({})",
                    pair[1].name, pair[1].base_score, pair[0].name, pair[0].base_score
                )));
            }
        }

        let (first, last) = (&tiers[0], &tiers[tiers.len() - 1]);
        if last.base_score.checked_sub(first.base_score).is_none() {
            return Err(RankTrackerError::ConfigError(format!(
                "Scores from {} to {} do not fit in a 64-bit range",
                first.base_score, last.base_score
            )));
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }

    pub fn terminal(&self) -> &RankTier {
        // Non-empty by construction.
        &self.tiers[self.tiers.len() - 1]
    }
}

impl Default for RankScale {
    /// The Apex Legends ranked ladder.
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

pub fn default_tiers() -> Vec<RankTier> {
    vec![
        RankTier::new("unranked", 0, 1),
        RankTier::new("bronze", 1000, 4),
        RankTier::new("silver", 3000, 4),
        RankTier::new("gold", 5400, 4),
        RankTier::new("platinum", 8200, 4),
        RankTier::new("diamond", 11400, 4),
        RankTier::new("master", 15000, 1),
        RankTier::new("predator", 100000, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_is_valid() {
        let scale = RankScale::new(default_tiers()).unwrap();
        assert_eq!(scale, RankScale::default());
        assert_eq!(scale.terminal().name, "predator");
    }

    #[test]
    fn test_rejects_single_tier() {
        let result = RankScale::new(vec![RankTier::new("bronze", 0, 4)]);
        assert!(matches!(result, Err(RankTrackerError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_zero_divisions() {
        let result = RankScale::new(vec![
            RankTier::new("bronze", 0, 0),
            RankTier::new("silver", 100, 1),
        ]);
        assert!(matches!(result, Err(RankTrackerError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_non_increasing_scores() {
        let result = RankScale::new(vec![
            RankTier::new("bronze", 1000, 4),
            RankTier::new("silver", 1000, 4),
        ]);
        assert!(matches!(result, Err(RankTrackerError::ConfigError(_))));

        let result = RankScale::new(vec![
            RankTier::new("silver", 3000, 4),
            RankTier::new("bronze", 1000, 4),
        ]);
        assert!(matches!(result, Err(RankTrackerError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_range_wider_than_i64() {
        let result = RankScale::new(vec![
            RankTier::new("low", -5_000_000_000_000_000_000, 4),
            RankTier::new("high", 5_000_000_000_000_000_000, 1),
        ]);
        assert!(matches!(result, Err(RankTrackerError::ConfigError(_))));

        let extreme = RankScale::new(vec![
            RankTier::new("low", 0, 4),
            RankTier::new("high", i64::MAX, 1),
        ]);
        assert!(extreme.is_ok());
    }

    #[test]
    fn test_tier_config_field_names() {
        let tier: RankTier =
            serde_json::from_str(r#"{ "name": "gold", "score": 5400, "divisions": 4 }"#).unwrap();
        assert_eq!(tier, RankTier::new("gold", 5400, 4));
    }
}
