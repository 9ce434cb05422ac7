use serde::Serialize;

use crate::ladder::{RankScale, RankTier};
use crate::models::Result;

/// Score at which a player reaches `division` of `tier`. Division 0 of a
/// tier sits on the next tier's entry score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakpoint {
    pub tier: String,
    pub division: u32,
    pub score: i64,
}

/// Ascending, duplicate-free sequence of breakpoints over every tier except
/// the terminal one.
#[derive(Debug, Clone)]
pub struct Ladder {
    breakpoints: Vec<Breakpoint>,
    terminal_tier: String,
}

impl Ladder {
    pub fn build(scale: &RankScale) -> Self {
        let mut breakpoints: Vec<Breakpoint> = Vec::new();

        for pair in scale.tiers().windows(2) {
            let (tier, next) = (&pair[0], &pair[1]);

            for bp in tier_breakpoints(tier, next.base_score) {
                // Tier boundaries (and truncation on narrow tiers) repeat the
                // previous score; the first one emitted wins.
                if breakpoints.last().map_or(false, |last| last.score >= bp.score) {
                    continue;
                }
                breakpoints.push(bp);
            }
        }

        Self {
            breakpoints,
            terminal_tier: scale.terminal().name.clone(),
        }
    }

    /// Validate raw tiers and build the ladder in one step.
    pub fn from_tiers(tiers: Vec<RankTier>) -> Result<Self> {
        Ok(Self::build(&RankScale::new(tiers)?))
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn terminal_tier(&self) -> &str {
        &self.terminal_tier
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }
}

fn tier_breakpoints(tier: &RankTier, next_base: i64) -> impl Iterator<Item = Breakpoint> + '_ {
    let step = next_base.saturating_sub(tier.base_score) as f64 / tier.division_count as f64;

    (0..=tier.division_count).rev().map(move |division| Breakpoint {
        tier: tier.name.clone(),
        division,
        score: (next_base as f64 - step * division as f64) as i64,
    })
}
