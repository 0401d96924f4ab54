// Library root: the hitting/pitching analytics engine behind the GAC hub.
//
// raw CSV table -> normalize -> typed dataset -> reports / leaderboards,
// plus the standalone swing metrics calculator.

pub mod aggregate;
pub mod config;
pub mod leaderboard;
pub mod metrics;
pub mod normalize;
pub mod report;
pub mod rounding;
pub mod table;

pub use aggregate::HARD_HIT_MPH;
pub use leaderboard::{hitting_leaderboard, leaderboard, pitching_leaderboard, Leaderboard};
pub use metrics::{classify, evaluate, swing_acceleration, swing_length, swing_score, SwingCluster};
pub use normalize::{
    normalize, normalize_as, normalize_hitting, normalize_pitching, DatasetKind, HittingDataset,
    NormalizedDataset, PitchingDataset, SchemaError,
};
pub use report::{hitter_report, pitch_locations, pitcher_report};
pub use table::{load_table, LoadError, RawTable};

/// Load a CSV export and normalize it as hitting data.
pub fn load_hitting(path: &std::path::Path) -> Result<HittingDataset, LoadError> {
    Ok(normalize_hitting(&load_table(path)?)?)
}

/// Load a CSV export and normalize it as pitching data.
pub fn load_pitching(path: &std::path::Path) -> Result<PitchingDataset, LoadError> {
    Ok(normalize_pitching(&load_table(path)?)?)
}
