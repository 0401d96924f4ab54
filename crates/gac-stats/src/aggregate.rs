// Running tallies shared by the player reports and the leaderboards.
//
// Values are accumulated at full precision; rounding is left to whoever
// renders them.

use crate::normalize::{HittingRecord, PitchingRecord};

/// Exit velocity at or above which a batted ball counts as hard hit (mph).
pub const HARD_HIT_MPH: f64 = 90.0;

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Count, mean, and maximum of a stream of values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summary {
    count: usize,
    sum: f64,
    max: Option<f64>,
}

impl Summary {
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    pub fn add_opt(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.add(v);
        }
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }
}

/// Batted-ball tally for one player. Only hits (exit velocity > 0) count.
#[derive(Debug, Clone, Copy, Default)]
pub struct BattedBallTally {
    pub hits: usize,
    pub hard_hits: usize,
    pub exit_velocity: Summary,
    pub distance: Summary,
}

impl BattedBallTally {
    pub fn add(&mut self, record: &HittingRecord) {
        if record.exit_velocity <= 0.0 {
            return;
        }
        self.hits += 1;
        if record.exit_velocity >= HARD_HIT_MPH {
            self.hard_hits += 1;
        }
        self.exit_velocity.add(record.exit_velocity);
        self.distance.add_opt(record.distance);
    }

    pub fn hard_hit_pct(&self) -> f64 {
        percentage(self.hard_hits, self.hits)
    }
}

impl<'a> FromIterator<&'a HittingRecord> for BattedBallTally {
    fn from_iter<I: IntoIterator<Item = &'a HittingRecord>>(iter: I) -> Self {
        let mut tally = BattedBallTally::default();
        for record in iter {
            tally.add(record);
        }
        tally
    }
}

/// Pitch tally for one player, or one player's pitch type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PitchTally {
    pub pitches: usize,
    pub strikes: usize,
    pub velocity: Summary,
    pub horizontal_break: Summary,
    pub vertical_break: Summary,
}

impl PitchTally {
    pub fn add(&mut self, record: &PitchingRecord) {
        self.pitches += 1;
        if record.is_strike {
            self.strikes += 1;
        }
        self.velocity.add(record.velocity);
        self.horizontal_break.add_opt(record.horizontal_break);
        self.vertical_break.add_opt(record.vertical_break);
    }

    pub fn strike_pct(&self) -> f64 {
        percentage(self.strikes, self.pitches)
    }
}

impl<'a> FromIterator<&'a PitchingRecord> for PitchTally {
    fn from_iter<I: IntoIterator<Item = &'a PitchingRecord>>(iter: I) -> Self {
        let mut tally = PitchTally::default();
        for record in iter {
            tally.add(record);
        }
        tally
    }
}
