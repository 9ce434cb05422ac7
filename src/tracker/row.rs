use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ladder::{division_numeral, progress_bar, Ladder, Progress};
use crate::models::{PlayerKey, PlayerScoreState};
use crate::tracking::{format_delta, state_label};

pub const UNAVAILABLE: &str = "unavailable";

/// One display-ready table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRow {
    pub index: usize,
    pub name: String,
    pub rank: String,
    pub progress: String,
    pub delta: String,
    pub activity: String,
    pub state: String,
    pub available: bool,
}

impl PlayerRow {
    pub const HEADERS: [&'static str; 7] =
        ["No", "Nickname", "Rank", "Progress", "Delta", "Legend(Kills)", "State"];

    pub fn from_state(
        index: usize,
        state: &PlayerScoreState,
        ladder: &Ladder,
        delta: Option<i64>,
        progress_width: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            index,
            name: display_name(state),
            rank: rank_label(&state.reported_rank, state.reported_division),
            progress: progress_text(&ladder.locate(state.raw_score), state.raw_score, progress_width),
            delta: format_delta(delta),
            activity: activity_text(state),
            state: state_label(state, now),
            available: true,
        }
    }

    pub fn unavailable(index: usize, key: &PlayerKey) -> Self {
        Self {
            index,
            name: key.nickname.clone(),
            rank: UNAVAILABLE.to_string(),
            progress: UNAVAILABLE.to_string(),
            delta: String::new(),
            activity: UNAVAILABLE.to_string(),
            state: UNAVAILABLE.to_string(),
            available: false,
        }
    }

    pub fn cells(&self) -> [String; 7] {
        [
            self.index.to_string(),
            self.name.clone(),
            self.rank.clone(),
            self.progress.clone(),
            self.delta.clone(),
            self.activity.clone(),
            self.state.clone(),
        ]
    }
}

/// `nickname(api_name)` when the feed knows the player under another name.
pub fn display_name(state: &PlayerScoreState) -> String {
    if state.api_nickname == state.key.nickname {
        state.key.nickname.clone()
    } else {
        format!("{}({})", state.key.nickname, state.api_nickname)
    }
}

pub fn rank_label(rank: &str, division: u32) -> String {
    format!("{} {}", rank, division_numeral(division))
        .trim_end()
        .to_uppercase()
}

pub fn progress_text(progress: &Progress, score: i64, width: usize) -> String {
    match progress.next_score() {
        Some(next) => format!("{} {}/{}", progress_bar(progress.fraction(), width), score, next),
        None => format!("{} {}", progress_bar(1.0, width), score),
    }
}

pub fn activity_text(state: &PlayerScoreState) -> String {
    match &state.activity {
        Some(activity) => match activity.kills {
            Some(kills) => format!("{}({})", activity.legend, kills),
            None => activity.legend.clone(),
        },
        None => "-".to_string(),
    }
}
