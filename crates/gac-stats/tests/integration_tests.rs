// Integration tests for the stats engine.
//
// These run the whole pipeline through the crate's public API: load a CSV
// export from disk, normalize it, then build reports and leaderboards.

use std::path::{Path, PathBuf};

use gac_stats::leaderboard::Leaderboard;
use gac_stats::normalize::DatasetKind;
use gac_stats::report::STRIKE_ZONE;
use gac_stats::*;

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ===========================================================================
// Loading and normalization
// ===========================================================================

#[test]
fn hitting_fixture_loads_with_non_ascii_headers() {
    let ds = load_hitting(&fixture("hitting.csv")).expect("hitting fixture should load");
    assert_eq!(ds.len(), 9);
    assert_eq!(ds.dropped(), 2);
    assert_eq!(
        ds.player_names(),
        vec!["Jane Doe", "John Roe", "Kim Park", "Lou Diaz"]
    );
}

#[test]
fn pitching_fixture_loads_without_vertical_break() {
    let ds = load_pitching(&fixture("pitching.csv")).expect("pitching fixture should load");
    assert_eq!(ds.len(), 8);
    assert_eq!(ds.dropped(), 3);
    assert!(ds.iter().all(|r| r.vertical_break.is_none()));
    assert_eq!(ds.player_names(), vec!["Ann Moss", "Sam Lee"]);
}

#[test]
fn loading_hitting_file_as_pitching_is_schema_error() {
    let err = load_pitching(&fixture("hitting.csv")).unwrap_err();
    match err {
        LoadError::Schema(schema) => {
            assert_eq!(schema.kind, DatasetKind::Pitching);
            assert!(schema.missing.contains(&"Pitch Type".to_string()));
            assert!(schema.missing.contains(&"Is Strike".to_string()));
        }
        other => panic!("expected schema error, got: {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let err = load_hitting(&fixture("does-not-exist.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn normalized_rows_have_required_values() {
    let ds = load_hitting(&fixture("hitting.csv")).unwrap();
    for r in ds.iter() {
        assert!(r.exit_velocity.is_finite());
        assert!(r.launch_angle.is_finite());
        assert!(r.exit_direction.is_finite());
    }
}

#[test]
fn renormalizing_fixture_is_idempotent() {
    let once = load_pitching(&fixture("pitching.csv")).unwrap();
    let twice = normalize_pitching(&once.to_table()).unwrap();
    assert_eq!(twice.dropped(), 0);
    assert_eq!(twice.records(), once.records());

    let once = load_hitting(&fixture("hitting.csv")).unwrap();
    let twice = normalize_hitting(&once.to_table()).unwrap();
    assert_eq!(twice.records(), once.records());
}

#[test]
fn normalized_table_survives_csv_round_trip() {
    let once = load_hitting(&fixture("hitting.csv")).unwrap();
    let mut buf = Vec::new();
    once.to_table().write_csv(&mut buf).unwrap();
    let reread = RawTable::from_reader(buf.as_slice()).unwrap();
    assert_eq!(normalize_hitting(&reread).unwrap().records(), once.records());
}

// ===========================================================================
// Reports
// ===========================================================================

#[test]
fn hitter_report_from_fixture() {
    let ds = load_hitting(&fixture("hitting.csv")).unwrap();
    let report = hitter_report(&ds, "jane doe");
    assert_eq!(report.events, 4);
    assert_eq!(report.batted_balls, 3);
    assert!(approx(report.avg_exit_velocity, 91.7));
    assert_eq!(report.max_exit_velocity, 95.4);
    assert_eq!(report.max_distance, 341.0);
    assert!(approx(report.hard_hit_pct, 200.0 / 3.0));
}

#[test]
fn hitter_report_for_player_without_hits() {
    let ds = load_hitting(&fixture("hitting.csv")).unwrap();
    let report = hitter_report(&ds, "Kim");
    assert_eq!(report.events, 2);
    assert_eq!(report.batted_balls, 0);
    assert_eq!(report.hard_hit_pct, 0.0);
    assert_eq!(report.max_exit_velocity, 0.0);
}

#[test]
fn pitcher_report_from_fixture() {
    let ds = load_pitching(&fixture("pitching.csv")).unwrap();
    let report = pitcher_report(&ds, "Ann");
    assert_eq!(report.total_pitches, 3);
    assert!(approx(report.overall_strike_pct, 200.0 / 3.0));
    let types: Vec<&str> = report.pitch_types.iter().map(|p| p.pitch_type.as_str()).collect();
    assert_eq!(types, vec!["Changeup", "Fastball"]);
    assert!(approx(report.pitch_types[0].avg_velocity, 79.85));
    assert!(approx(report.pitch_types[0].avg_horizontal_break.unwrap(), 6.0));
    assert_eq!(report.pitch_types[0].avg_vertical_break, None);
}

#[test]
fn pitch_locations_from_fixture() {
    let ds = load_pitching(&fixture("pitching.csv")).unwrap();
    let points = pitch_locations(&ds, "Sam Lee", "Fastball");
    assert_eq!(points.len(), 3);
    assert_eq!(points.iter().filter(|p| STRIKE_ZONE.contains(p)).count(), 2);
}

// ===========================================================================
// Leaderboards
// ===========================================================================

#[test]
fn hitting_leaderboard_from_fixture() {
    let ds = load_hitting(&fixture("hitting.csv")).unwrap();
    let rows = hitting_leaderboard(&ds);
    let names: Vec<&str> = rows.iter().map(|r| r.player_name.as_str()).collect();
    assert_eq!(names, vec!["John Roe", "Jane Doe", "Lou Diaz"]);
    assert_eq!(rows[0].hard_hit_pct, 50.0);
    assert_eq!(rows[0].max_distance, Some(412.0));
    assert_eq!(rows[2].hard_hit_pct, 0.0);
}

#[test]
fn pitching_leaderboards_from_fixture() {
    let table = load_table(&fixture("pitching.csv")).unwrap();
    let ds = normalize_as(&table, DatasetKind::Pitching).unwrap();
    let Leaderboard::Pitching(boards) = leaderboard(&ds) else {
        panic!("expected pitching leaderboards");
    };

    let overall: Vec<&str> = boards.overall.iter().map(|r| r.player_name.as_str()).collect();
    assert_eq!(overall, vec!["Ann Moss", "Sam Lee"]);

    let by_type: Vec<(&str, f64)> = boards
        .by_pitch_type
        .iter()
        .map(|r| (r.pitch_type.as_str(), r.max_velocity))
        .collect();
    assert_eq!(
        by_type,
        vec![
            ("Fastball", 93.4),
            ("Fastball", 90.1),
            ("Changeup", 80.6),
            ("Slider", 80.3),
            ("Curveball", 72.8),
        ]
    );
}

#[test]
fn leaderboards_sorted_descending() {
    let hitting = load_hitting(&fixture("hitting.csv")).unwrap();
    let rows = hitting_leaderboard(&hitting);
    assert!(rows.windows(2).all(|w| w[0].max_exit_velocity >= w[1].max_exit_velocity));

    let pitching = load_pitching(&fixture("pitching.csv")).unwrap();
    let boards = pitching_leaderboard(&pitching);
    assert!(boards.overall.windows(2).all(|w| w[0].max_velocity >= w[1].max_velocity));
    assert!(boards
        .by_pitch_type
        .windows(2)
        .all(|w| w[0].max_velocity >= w[1].max_velocity));
}

// ===========================================================================
// Swing metrics
// ===========================================================================

#[test]
fn swing_evaluation_end_to_end() {
    let input = metrics::SwingInput {
        bat_speed: 75.0,
        attack_angle: 10.0,
        time_to_contact: 0.12,
    };
    let m = evaluate(&input, &metrics::SwingScoreScale::default()).unwrap();
    assert!(approx(m.swing_length, 6.600176004693459));
    assert!(approx(m.swing_acceleration, 28.4907175));
    assert!(approx(m.swing_score, 73.96287));
    assert_eq!(m.cluster, SwingCluster::Orange);
    assert_eq!(classify(73.3, 24.03, 8.84).name(), "Orange");
}
