// Leaderboards across every player in a dataset.
//
// Players are grouped by exact name (blank names are left out), tallied, and
// ranked by a single metric, descending. Rows with an equal metric stay in
// player-name order.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::{BattedBallTally, PitchTally};
use crate::normalize::{HittingDataset, NormalizedDataset, PitchingDataset};
use crate::rounding::{serialize_round2, serialize_round2_opt};

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HittingLeader {
    pub player_name: String,
    pub batted_balls: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub max_exit_velocity: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub hard_hit_pct: f64,
    /// `None` when none of the player's hits has a distance reading.
    #[serde(serialize_with = "serialize_round2_opt")]
    pub max_distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchingLeader {
    pub player_name: String,
    pub pitches: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub max_velocity: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub strike_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchTypeLeader {
    pub player_name: String,
    pub pitch_type: String,
    pub pitches: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub max_velocity: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub avg_velocity: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub strike_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchingLeaderboards {
    pub overall: Vec<PitchingLeader>,
    pub by_pitch_type: Vec<PitchTypeLeader>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Leaderboard {
    Hitting { rows: Vec<HittingLeader> },
    Pitching(PitchingLeaderboards),
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn rank_desc<T>(rows: &mut [T], metric: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| metric(b).total_cmp(&metric(a)));
}

/// Hitters ranked by max exit velocity. Players with no hits (exit velocity
/// above zero) do not appear.
pub fn hitting_leaderboard(dataset: &HittingDataset) -> Vec<HittingLeader> {
    let mut tallies: BTreeMap<&str, BattedBallTally> = BTreeMap::new();
    for record in dataset.iter().filter(|r| r.exit_velocity > 0.0 && !r.player_name.is_empty()) {
        tallies.entry(record.player_name.as_str()).or_default().add(record);
    }

    let mut rows: Vec<HittingLeader> = tallies
        .into_iter()
        .map(|(name, tally)| HittingLeader {
            player_name: name.to_string(),
            batted_balls: tally.hits,
            max_exit_velocity: tally.exit_velocity.max().unwrap_or(0.0),
            hard_hit_pct: tally.hard_hit_pct(),
            max_distance: tally.distance.max(),
        })
        .collect();
    rank_desc(&mut rows, |r| r.max_exit_velocity);
    rows
}

/// Pitchers overall and per pitch type, both ranked by max velocity.
pub fn pitching_leaderboard(dataset: &PitchingDataset) -> PitchingLeaderboards {
    let mut by_player: BTreeMap<&str, PitchTally> = BTreeMap::new();
    let mut by_pitch: BTreeMap<(&str, &str), PitchTally> = BTreeMap::new();
    for record in dataset.iter().filter(|r| !r.player_name.is_empty()) {
        let name = record.player_name.as_str();
        by_player.entry(name).or_default().add(record);
        by_pitch
            .entry((name, record.pitch_type.as_str()))
            .or_default()
            .add(record);
    }

    let mut overall: Vec<PitchingLeader> = by_player
        .into_iter()
        .map(|(name, tally)| PitchingLeader {
            player_name: name.to_string(),
            pitches: tally.pitches,
            max_velocity: tally.velocity.max().unwrap_or(0.0),
            strike_pct: tally.strike_pct(),
        })
        .collect();
    rank_desc(&mut overall, |r| r.max_velocity);

    let mut by_pitch_type: Vec<PitchTypeLeader> = by_pitch
        .into_iter()
        .map(|((name, pitch_type), tally)| PitchTypeLeader {
            player_name: name.to_string(),
            pitch_type: pitch_type.to_string(),
            pitches: tally.pitches,
            max_velocity: tally.velocity.max().unwrap_or(0.0),
            avg_velocity: tally.velocity.mean().unwrap_or(0.0),
            strike_pct: tally.strike_pct(),
        })
        .collect();
    rank_desc(&mut by_pitch_type, |r| r.max_velocity);

    PitchingLeaderboards {
        overall,
        by_pitch_type,
    }
}

/// Leaderboard for whichever kind of dataset is given.
pub fn leaderboard(dataset: &NormalizedDataset) -> Leaderboard {
    match dataset {
        NormalizedDataset::Hitting(d) => Leaderboard::Hitting {
            rows: hitting_leaderboard(d),
        },
        NormalizedDataset::Pitching(d) => Leaderboard::Pitching(pitching_leaderboard(d)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
