// Plain-text rendering of reports, leaderboards, and swing metrics.
//
// Numbers are rounded to two decimals here; the library keeps full precision.

use std::io::{self, Write};

use gac_stats::leaderboard::{HittingLeader, Leaderboard, PitchingLeaderboards};
use gac_stats::metrics::SwingMetrics;
use gac_stats::normalize::{DatasetKind, PitchingDataset};
use gac_stats::report::{HitterReport, PitcherReport, STRIKE_ZONE};
use gac_stats::rounding::round2;
use gac_stats::{pitch_locations, HARD_HIT_MPH};

/// How many of one pitcher's located pitches of one type landed in the zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSummary {
    pub player_name: String,
    pub pitch_type: String,
    pub located: usize,
    pub in_zone: usize,
}

fn num(value: f64) -> String {
    format!("{:.2}", round2(value))
}

fn opt_num(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), num)
}

pub fn hitter_report(out: &mut impl Write, report: &HitterReport) -> io::Result<()> {
    writeln!(out, "Hitting report: {}", report.player_name)?;
    if report.events == 0 {
        writeln!(out, "  No hitting events found.")?;
    }
    writeln!(out, "  Events:            {}", report.events)?;
    writeln!(out, "  Batted balls:      {}", report.batted_balls)?;
    writeln!(out, "  Avg exit velocity: {} mph", num(report.avg_exit_velocity))?;
    writeln!(out, "  Max exit velocity: {} mph", num(report.max_exit_velocity))?;
    writeln!(out, "  Max distance:      {} ft", num(report.max_distance))?;
    writeln!(
        out,
        "  Hard hit (>= {} mph): {}%",
        HARD_HIT_MPH,
        num(report.hard_hit_pct)
    )?;
    Ok(())
}

/// In-zone counts per pitcher and pitch type for the players a pitching
/// report covered.
pub fn zone_summaries(dataset: &PitchingDataset, report: &PitcherReport) -> Vec<ZoneSummary> {
    let query = report.player_name.to_lowercase();
    let mut summaries = Vec::new();
    for player in dataset.player_names() {
        if !player.to_lowercase().contains(&query) {
            continue;
        }
        for stats in &report.pitch_types {
            let points = pitch_locations(dataset, &player, &stats.pitch_type);
            if points.is_empty() {
                continue;
            }
            summaries.push(ZoneSummary {
                player_name: player.clone(),
                pitch_type: stats.pitch_type.clone(),
                located: points.len(),
                in_zone: points.iter().filter(|p| STRIKE_ZONE.contains(p)).count(),
            });
        }
    }
    summaries
}

pub fn pitcher_report(
    out: &mut impl Write,
    report: &PitcherReport,
    zones: &[ZoneSummary],
) -> io::Result<()> {
    writeln!(out, "Pitching report: {}", report.player_name)?;
    if report.total_pitches == 0 {
        writeln!(out, "  No pitches found.")?;
    }
    writeln!(out, "  Total pitches: {}", report.total_pitches)?;
    writeln!(out, "  Strike %:      {}", num(report.overall_strike_pct))?;
    if report.pitch_types.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(
        out,
        "  {:<14} {:>7} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Pitch", "Count", "Usage%", "AvgVelo", "MaxVelo", "AvgHB", "AvgVB", "Strike%"
    )?;
    for p in &report.pitch_types {
        writeln!(
            out,
            "  {:<14} {:>7} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            p.pitch_type,
            p.pitches,
            num(p.usage_pct),
            num(p.avg_velocity),
            num(p.max_velocity),
            opt_num(p.avg_horizontal_break),
            opt_num(p.avg_vertical_break),
            num(p.strike_pct),
        )?;
    }

    if !zones.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Pitch locations in the strike zone:")?;
        for z in zones {
            writeln!(
                out,
                "  {:<20} {:<14} {}/{} in zone",
                z.player_name, z.pitch_type, z.in_zone, z.located
            )?;
        }
    }
    Ok(())
}

pub fn leaderboard(out: &mut impl Write, board: &Leaderboard) -> io::Result<()> {
    match board {
        Leaderboard::Hitting { rows } => hitting_leaderboard(out, rows),
        Leaderboard::Pitching(boards) => pitching_leaderboards(out, boards),
    }
}

fn hitting_leaderboard(out: &mut impl Write, rows: &[HittingLeader]) -> io::Result<()> {
    writeln!(out, "Hitting leaderboard (max exit velocity)")?;
    if rows.is_empty() {
        writeln!(out, "  No batted balls found.")?;
        return Ok(());
    }
    writeln!(
        out,
        "  {:>3} {:<20} {:>6} {:>8} {:>9} {:>8}",
        "#", "Player", "BBE", "MaxEV", "HardHit%", "MaxDist"
    )?;
    for (i, r) in rows.iter().enumerate() {
        writeln!(
            out,
            "  {:>3} {:<20} {:>6} {:>8} {:>9} {:>8}",
            i + 1,
            r.player_name,
            r.batted_balls,
            num(r.max_exit_velocity),
            num(r.hard_hit_pct),
            opt_num(r.max_distance),
        )?;
    }
    Ok(())
}

fn pitching_leaderboards(out: &mut impl Write, boards: &PitchingLeaderboards) -> io::Result<()> {
    writeln!(out, "Pitching leaderboard (max velocity)")?;
    if boards.overall.is_empty() {
        writeln!(out, "  No pitches found.")?;
        return Ok(());
    }
    writeln!(
        out,
        "  {:>3} {:<20} {:>7} {:>8} {:>8}",
        "#", "Player", "Pitches", "MaxVelo", "Strike%"
    )?;
    for (i, r) in boards.overall.iter().enumerate() {
        writeln!(
            out,
            "  {:>3} {:<20} {:>7} {:>8} {:>8}",
            i + 1,
            r.player_name,
            r.pitches,
            num(r.max_velocity),
            num(r.strike_pct),
        )?;
    }

    writeln!(out)?;
    writeln!(out, "By pitch type")?;
    writeln!(
        out,
        "  {:>3} {:<20} {:<14} {:>7} {:>8} {:>8} {:>8}",
        "#", "Player", "Pitch", "Pitches", "MaxVelo", "AvgVelo", "Strike%"
    )?;
    for (i, r) in boards.by_pitch_type.iter().enumerate() {
        writeln!(
            out,
            "  {:>3} {:<20} {:<14} {:>7} {:>8} {:>8} {:>8}",
            i + 1,
            r.player_name,
            r.pitch_type,
            r.pitches,
            num(r.max_velocity),
            num(r.avg_velocity),
            num(r.strike_pct),
        )?;
    }
    Ok(())
}

pub fn player_names(out: &mut impl Write, kind: DatasetKind, names: &[String]) -> io::Result<()> {
    if names.is_empty() {
        writeln!(out, "No {} players found.", kind.label())?;
        return Ok(());
    }
    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

pub fn swing(out: &mut impl Write, m: &SwingMetrics) -> io::Result<()> {
    let profile = m.cluster.profile();
    writeln!(out, "Bat Speed:          {} mph", num(m.input.bat_speed))?;
    writeln!(out, "Attack Angle:       {} deg", num(m.input.attack_angle))?;
    writeln!(out, "Time to Contact:    {} s", num(m.input.time_to_contact))?;
    writeln!(out, "Swing Length:       {} ft", num(m.swing_length))?;
    writeln!(out, "Swing Acceleration: {} g", num(m.swing_acceleration))?;
    writeln!(out, "Swing Score:        {}", num(m.swing_score))?;
    writeln!(out)?;
    writeln!(out, "Cluster: {}", m.cluster)?;
    writeln!(out, "  {}", profile.description)?;
    writeln!(out, "  Comparable hitters: {}", profile.comparables.join(", "))?;
    let e = &profile.expected;
    writeln!(
        out,
        "  Expected: wOBA {:.3}, whiff {:.1}%, barrel {:.1}%, AVG {:.3}, ISO {:.3}",
        e.woba, e.whiff_pct, e.barrel_pct, e.batting_avg, e.iso
    )?;
    Ok(())
}
