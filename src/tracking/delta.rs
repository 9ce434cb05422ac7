use chrono::{DateTime, Duration, Utc};

use crate::models::{PersistedSnapshot, PlayerScoreState};
use crate::tracking::SnapshotStore;

/// Compares live scores against the stored baseline.
///
/// Players without a baseline get one inserted during the first cycle only,
/// so their delta becomes meaningful from the second cycle onward.
#[derive(Debug)]
pub struct DeltaTracker {
    first_cycle: bool,
}

impl Default for DeltaTracker {
    fn default() -> Self {
        Self { first_cycle: true }
    }
}

impl DeltaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_first_cycle(&self) -> bool {
        self.first_cycle
    }

    /// Signed change of `state.raw_score` against the player's baseline.
    /// Also refreshes `state.last_online` and records the observation.
    pub fn observe(
        &self,
        store: &mut SnapshotStore,
        state: &mut PlayerScoreState,
        now: DateTime<Utc>,
    ) -> Option<i64> {
        state.last_online = if state.is_in_game {
            Some(now)
        } else {
            store.last_online(&state.key)
        };

        let delta = match store.get(&state.key) {
            Some(snapshot) => Some(state.raw_score.saturating_sub(snapshot.data.score)),
            None => {
                if self.first_cycle {
                    store.insert(PersistedSnapshot::from_state(state));
                }
                None
            }
        };

        store.record(state);
        delta
    }

    pub fn end_cycle(&mut self) {
        self.first_cycle = false;
    }
}

/// `+N` for gains, `-N` for losses, empty for no change.
pub fn format_delta(delta: Option<i64>) -> String {
    match delta {
        Some(d) if d > 0 => format!("+{}", d),
        Some(d) if d < 0 => d.to_string(),
        _ => String::new(),
    }
}

/// Non-zero days, hours and minutes, largest first: `"2d 3h"`, `"1d 5m"`.
/// Anything under a minute renders empty.
pub fn format_elapsed(elapsed: Duration) -> String {
    let minutes = elapsed.num_minutes().max(0);
    let parts = [
        (minutes / (24 * 60), 'd'),
        ((minutes / 60) % 24, 'h'),
        (minutes % 60, 'm'),
    ];

    parts
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

/// How long an offline player has been away, if known.
pub fn offline_elapsed(state: &PlayerScoreState, now: DateTime<Utc>) -> Option<Duration> {
    if !state.is_offline() {
        return None;
    }
    state.last_online.map(|seen| now - seen)
}

/// The state text, suffixed with the offline duration when there is one.
pub fn state_label(state: &PlayerScoreState, now: DateTime<Utc>) -> String {
    match offline_elapsed(state, now).map(format_elapsed) {
        Some(elapsed) if !elapsed.is_empty() => format!("{} {}", state.state_text, elapsed),
        _ => state.state_text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerKey;
    use chrono::TimeZone;

    fn state(score: i64) -> PlayerScoreState {
        PlayerScoreState {
            key: PlayerKey::new("alpha", "PC"),
            api_nickname: "alpha".to_string(),
            level: 100,
            raw_score: score,
            reported_rank: "Gold".to_string(),
            reported_division: 2,
            is_online: true,
            is_in_game: false,
            party_full: false,
            state_text: "In lobby".to_string(),
            activity: None,
            last_online: None,
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_first_cycle_inserts_without_delta() {
        let mut store = SnapshotStore::in_memory();
        let tracker = DeltaTracker::new();

        let delta = tracker.observe(&mut store, &mut state(6000), at(10, 0));
        assert_eq!(delta, None);
        assert_eq!(format_delta(delta), "");
        assert_eq!(store.get(&PlayerKey::new("alpha", "PC")).unwrap().data.score, 6000);
    }

    #[test]
    fn test_later_cycles_report_signed_delta() {
        let mut store = SnapshotStore::in_memory();
        let mut tracker = DeltaTracker::new();
        tracker.observe(&mut store, &mut state(6000), at(10, 0));
        tracker.end_cycle();

        let delta = tracker.observe(&mut store, &mut state(6075), at(10, 5));
        assert_eq!(delta, Some(75));
        assert_eq!(format_delta(delta), "+75");

        let delta = tracker.observe(&mut store, &mut state(5940), at(10, 10));
        assert_eq!(delta, Some(-60));
        assert_eq!(format_delta(delta), "-60");

        assert_eq!(format_delta(tracker.observe(&mut store, &mut state(6000), at(10, 15))), "");
    }

    #[test]
    fn test_new_player_after_first_cycle_is_not_inserted() {
        let mut store = SnapshotStore::in_memory();
        let mut tracker = DeltaTracker::new();
        tracker.end_cycle();

        assert_eq!(tracker.observe(&mut store, &mut state(100), at(9, 0)), None);
        assert!(!store.contains(&PlayerKey::new("alpha", "PC")));
        // Still persisted through the latest observation.
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn test_in_game_updates_last_online() {
        let mut store = SnapshotStore::in_memory();
        let tracker = DeltaTracker::new();

        let mut playing = state(6000);
        playing.is_in_game = true;
        tracker.observe(&mut store, &mut playing, at(8, 0));
        assert_eq!(playing.last_online, Some(at(8, 0)));

        let mut offline = state(6000);
        offline.is_online = false;
        offline.state_text = "Offline".to_string();
        tracker.observe(&mut store, &mut offline, at(11, 30));
        assert_eq!(offline.last_online, Some(at(8, 0)));
        assert_eq!(state_label(&offline, at(11, 30)), "Offline 3h 30m");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::days(1) + Duration::minutes(5)), "1d 5m");
        assert_eq!(format_elapsed(Duration::days(2) + Duration::hours(3)), "2d 3h");
        assert_eq!(format_elapsed(Duration::hours(4)), "4h");
        assert_eq!(format_elapsed(Duration::seconds(59)), "");
        assert_eq!(format_elapsed(Duration::seconds(-30)), "");
    }

    #[test]
    fn test_state_label_without_history() {
        let mut offline = state(0);
        offline.is_online = false;
        offline.state_text = "Offline".to_string();
        assert_eq!(state_label(&offline, at(12, 0)), "Offline");

        let online = state(0);
        assert_eq!(state_label(&online, at(12, 0)), "In lobby");
    }
}
