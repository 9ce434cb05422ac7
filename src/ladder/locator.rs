use serde::Serialize;

use crate::ladder::Ladder;

/// Where a score sits on the ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Progress {
    /// Heading towards `division` of `tier`, which is reached at `next_score`.
    Climbing {
        tier: String,
        division: u32,
        fraction: f64,
        next_score: i64,
    },
    /// At or above the terminal tier's entry score.
    Terminal { tier: String },
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        match self {
            Progress::Climbing { fraction, .. } => *fraction,
            Progress::Terminal { .. } => 1.0,
        }
    }

    pub fn next_score(&self) -> Option<i64> {
        match self {
            Progress::Climbing { next_score, .. } => Some(*next_score),
            Progress::Terminal { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Progress::Terminal { .. })
    }
}

impl Ladder {
    pub fn locate(&self, score: i64) -> Progress {
        let breakpoints = self.breakpoints();
        let idx = breakpoints.partition_point(|b| b.score <= score);

        let Some(upper) = breakpoints.get(idx) else {
            return Progress::Terminal {
                tier: self.terminal_tier().to_string(),
            };
        };
        let lower = if idx == 0 { 0 } else { breakpoints[idx - 1].score };

        let span = upper.score.saturating_sub(lower);
        let fraction = if span <= 0 {
            1.0
        } else {
            (score.saturating_sub(lower) as f64 / span as f64).clamp(0.0, 1.0)
        };

        Progress::Climbing {
            tier: upper.tier.clone(),
            division: upper.division,
            fraction,
            next_score: upper.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder::{RankScale, RankTier};

    fn two_tier() -> Ladder {
        Ladder::from_tiers(vec![
            RankTier::new("Bronze", 1000, 4),
            RankTier::new("Silver", 3000, 4),
        ])
        .unwrap()
    }

    fn climbing(progress: Progress) -> (String, u32, f64, i64) {
        match progress {
            Progress::Climbing { tier, division, fraction, next_score } => {
                (tier, division, fraction, next_score)
            }
            Progress::Terminal { tier } => panic!("unexpected terminal tier {}", tier),
        }
    }

    #[test]
    fn test_locate_mid_division() {
        let (tier, division, fraction, next) = climbing(two_tier().locate(1900));
        assert_eq!(tier, "Bronze");
        assert_eq!(division, 2);
        assert!((fraction - 0.8).abs() < 1e-9);
        assert_eq!(next, 2000);
    }

    #[test]
    fn test_locate_exact_breakpoint_starts_next_division() {
        let ladder = two_tier();

        let (_, division, fraction, next) = climbing(ladder.locate(1500));
        assert_eq!(division, 2);
        assert_eq!(fraction, 0.0);
        assert_eq!(next, 2000);

        let (_, division, fraction, next) = climbing(ladder.locate(1499));
        assert_eq!(division, 3);
        assert!((fraction - 499.0 / 500.0).abs() < 1e-9);
        assert_eq!(next, 1500);
    }

    #[test]
    fn test_score_below_first_breakpoint_uses_zero_floor() {
        let (tier, division, fraction, next) = climbing(two_tier().locate(500));
        assert_eq!(tier, "Bronze");
        assert_eq!(division, 4);
        assert!((fraction - 0.5).abs() < 1e-9);
        assert_eq!(next, 1000);
    }

    #[test]
    fn test_negative_score_clamps_to_zero() {
        let (_, _, fraction, _) = climbing(two_tier().locate(-200));
        assert_eq!(fraction, 0.0);
    }

    #[test]
    fn test_zero_width_span_reports_full() {
        // First breakpoint sits on 0, so a negative score has a zero-width span.
        let ladder = Ladder::build(&RankScale::default());
        let (tier, _, fraction, next) = climbing(ladder.locate(-1));
        assert_eq!(tier, "unranked");
        assert_eq!(fraction, 1.0);
        assert_eq!(next, 0);
    }

    #[test]
    fn test_terminal_tier() {
        let ladder = two_tier();
        assert_eq!(ladder.locate(3000), Progress::Terminal { tier: "Silver".to_string() });
        assert!(ladder.locate(25000).is_terminal());
        assert_eq!(ladder.locate(25000).next_score(), None);
    }

    #[test]
    fn test_tier_boundary_on_default_ladder() {
        let ladder = Ladder::build(&RankScale::default());

        let (tier, division, _, next) = climbing(ladder.locate(2999));
        assert_eq!((tier.as_str(), division, next), ("bronze", 0, 3000));

        let (tier, division, fraction, next) = climbing(ladder.locate(3000));
        assert_eq!((tier.as_str(), division, next), ("silver", 3, 3600));
        assert_eq!(fraction, 0.0);

        let (tier, _, fraction, next) = climbing(ladder.locate(1200));
        assert_eq!(tier, "bronze");
        assert!((fraction - 0.4).abs() < 1e-9);
        assert_eq!(next, 1500);

        assert_eq!(
            ladder.locate(100000),
            Progress::Terminal { tier: "predator".to_string() }
        );
    }
}
