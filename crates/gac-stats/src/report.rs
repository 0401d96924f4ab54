// Per-player reports.
//
// A report selects every record whose player name contains the query
// (ignoring case) and summarizes them. No match is not an error: the report
// comes back with zero counts and zeroed statistics.

use serde::Serialize;
use std::collections::HashMap;

use crate::aggregate::{percentage, BattedBallTally, PitchTally};
use crate::normalize::{HittingDataset, PitchingDataset};
use crate::rounding::{serialize_round2, serialize_round2_opt};

// ---------------------------------------------------------------------------
// Hitting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitterReport {
    pub player_name: String,
    /// Matched events, hits or not.
    pub events: usize,
    /// Events with exit velocity above zero.
    pub batted_balls: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub avg_exit_velocity: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub max_exit_velocity: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub max_distance: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub hard_hit_pct: f64,
}

/// Summarize the batted balls of every player matching `query`.
pub fn hitter_report(dataset: &HittingDataset, query: &str) -> HitterReport {
    let mut events = 0;
    let tally: BattedBallTally = dataset.matching(query).inspect(|_| events += 1).collect();

    HitterReport {
        player_name: query.to_string(),
        events,
        batted_balls: tally.hits,
        avg_exit_velocity: tally.exit_velocity.mean().unwrap_or(0.0),
        max_exit_velocity: tally.exit_velocity.max().unwrap_or(0.0),
        max_distance: tally.distance.max().unwrap_or(0.0),
        hard_hit_pct: tally.hard_hit_pct(),
    }
}

// ---------------------------------------------------------------------------
// Pitching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchTypeStats {
    pub pitch_type: String,
    pub pitches: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub avg_velocity: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub max_velocity: f64,
    /// `None` when no pitch of this type has a break reading.
    #[serde(serialize_with = "serialize_round2_opt")]
    pub avg_horizontal_break: Option<f64>,
    #[serde(serialize_with = "serialize_round2_opt")]
    pub avg_vertical_break: Option<f64>,
    #[serde(serialize_with = "serialize_round2")]
    pub strike_pct: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub usage_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitcherReport {
    pub player_name: String,
    pub total_pitches: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub overall_strike_pct: f64,
    /// Most used pitch type first.
    pub pitch_types: Vec<PitchTypeStats>,
}

/// Summarize the pitches of every player matching `query`, overall and per
/// pitch type.
///
/// Pitch types are ordered by usage, descending. Equal usage keeps the order
/// in which the pitch types first appear in the data.
pub fn pitcher_report(dataset: &PitchingDataset, query: &str) -> PitcherReport {
    let mut overall = PitchTally::default();
    let mut groups: Vec<(&str, PitchTally)> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();

    for record in dataset.matching(query) {
        overall.add(record);
        let slot = *group_index
            .entry(record.pitch_type.as_str())
            .or_insert_with(|| {
                groups.push((record.pitch_type.as_str(), PitchTally::default()));
                groups.len() - 1
            });
        groups[slot].1.add(record);
    }

    let total = overall.pitches;
    let mut pitch_types: Vec<PitchTypeStats> = groups
        .into_iter()
        .map(|(pitch_type, tally)| PitchTypeStats {
            pitch_type: pitch_type.to_string(),
            pitches: tally.pitches,
            avg_velocity: tally.velocity.mean().unwrap_or(0.0),
            max_velocity: tally.velocity.max().unwrap_or(0.0),
            avg_horizontal_break: tally.horizontal_break.mean(),
            avg_vertical_break: tally.vertical_break.mean(),
            strike_pct: tally.strike_pct(),
            usage_pct: percentage(tally.pitches, total),
        })
        .collect();
    pitch_types.sort_by(|a, b| b.usage_pct.total_cmp(&a.usage_pct));

    PitcherReport {
        player_name: query.to_string(),
        total_pitches: total,
        overall_strike_pct: overall.strike_pct(),
        pitch_types,
    }
}

// ---------------------------------------------------------------------------
// Pitch locations
// ---------------------------------------------------------------------------

/// Where a pitch crossed the plate, in the exporter's strike zone units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchLocation {
    pub side: f64,
    pub height: f64,
}

/// Axis-aligned rectangle in strike zone coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneRect {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl ZoneRect {
    pub fn contains(&self, location: &PitchLocation) -> bool {
        (self.left..=self.left + self.width).contains(&location.side)
            && (self.bottom..=self.bottom + self.height).contains(&location.height)
    }
}

/// Rule-book strike zone as drawn on the pitch location charts.
pub const STRIKE_ZONE: ZoneRect = ZoneRect {
    left: -10.0,
    bottom: 15.0,
    width: 20.0,
    height: 25.0,
};

/// Plate locations of one pitcher's pitches of one type. Exact name and pitch
/// type match; pitches without both coordinates are skipped.
pub fn pitch_locations(dataset: &PitchingDataset, player_name: &str, pitch_type: &str) -> Vec<PitchLocation> {
    dataset
        .for_player(player_name)
        .filter(|r| r.pitch_type == pitch_type)
        .filter_map(|r| {
            Some(PitchLocation {
                side: r.zone_side?,
                height: r.zone_height?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
