// GAC hub entry point.
//
// Startup sequence:
// 1. Parse command-line arguments
// 2. Load config (copying defaults/ into config/ on first run)
// 3. Initialize tracing (stderr, so stdout stays clean for reports)
// 4. Load and normalize the dataset the command needs
// 5. Render the result as text or JSON

mod render;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use gac_stats::config::{self, Config};
use gac_stats::metrics::{self, SwingInput};
use gac_stats::normalize::{DatasetKind, HittingDataset, PitchingDataset};
use gac_stats::{leaderboard, report};

#[derive(Parser, Debug)]
#[command(name = "gac-hub", version, about = "Gustavus baseball hitting and pitching analytics")]
struct CliArgs {
    /// Print JSON instead of text tables.
    #[arg(long, global = true)]
    json: bool,

    /// Hitting CSV export (overrides the configured path).
    #[arg(long, global = true)]
    hitting: Option<PathBuf>,

    /// Pitching CSV export (overrides the configured path).
    #[arg(long, global = true)]
    pitching: Option<PathBuf>,

    /// Directory holding config/ and defaults/ (defaults to the current directory).
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Batted-ball report for players matching a name.
    HittingReport { player: String },

    /// Pitch mix report for players matching a name.
    PitchingReport { player: String },

    /// Ranked tables across all players.
    Leaderboard {
        #[arg(value_enum)]
        kind: Kind,
    },

    /// Distinct player names in a dataset.
    Players {
        #[arg(value_enum)]
        kind: Kind,
    },

    /// Swing length, acceleration, score, and cluster for one swing.
    Swing {
        /// Bat speed in mph (typically 50-90).
        #[arg(long, default_value_t = metrics::DEFAULT_BAT_SPEED)]
        bat_speed: f64,

        /// Attack angle in degrees (typically -5 to 25).
        #[arg(long, default_value_t = metrics::DEFAULT_ATTACK_ANGLE, allow_negative_numbers = true)]
        attack_angle: f64,

        /// Time to contact in seconds (typically 0.1-0.2).
        #[arg(long, default_value_t = metrics::DEFAULT_TIME_TO_CONTACT)]
        time_to_contact: f64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Hitting,
    Pitching,
}

impl From<Kind> for DatasetKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Hitting => DatasetKind::Hitting,
            Kind::Pitching => DatasetKind::Pitching,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let base_dir = match &args.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to determine current directory")?,
    };
    let config = config::load_config(&base_dir).context("failed to load configuration")?;

    init_tracing(&config.logging.filter)?;
    info!("GAC hub starting: {:?}", args.command);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&args, &config, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run(args: &CliArgs, config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    match &args.command {
        Command::HittingReport { player } => {
            let dataset = load_hitting(args, config)?;
            let report = report::hitter_report(&dataset, player);
            if report.events == 0 {
                warn!("no hitting events match '{}'", player);
            }
            if args.json {
                write_json(out, &report)?;
            } else {
                render::hitter_report(out, &report)?;
            }
        }
        Command::PitchingReport { player } => {
            let dataset = load_pitching(args, config)?;
            let report = report::pitcher_report(&dataset, player);
            if report.total_pitches == 0 {
                warn!("no pitches match '{}'", player);
            }
            if args.json {
                write_json(out, &report)?;
            } else {
                let zones = render::zone_summaries(&dataset, &report);
                render::pitcher_report(out, &report, &zones)?;
            }
        }
        Command::Leaderboard { kind } => {
            let board = match kind {
                Kind::Hitting => leaderboard::Leaderboard::Hitting {
                    rows: leaderboard::hitting_leaderboard(&load_hitting(args, config)?),
                },
                Kind::Pitching => leaderboard::Leaderboard::Pitching(
                    leaderboard::pitching_leaderboard(&load_pitching(args, config)?),
                ),
            };
            if args.json {
                write_json(out, &board)?;
            } else {
                render::leaderboard(out, &board)?;
            }
        }
        Command::Players { kind } => {
            let names = match kind {
                Kind::Hitting => load_hitting(args, config)?.player_names(),
                Kind::Pitching => load_pitching(args, config)?.player_names(),
            };
            if args.json {
                write_json(out, &names)?;
            } else {
                render::player_names(out, DatasetKind::from(*kind), &names)?;
            }
        }
        Command::Swing {
            bat_speed,
            attack_angle,
            time_to_contact,
        } => {
            let input = SwingInput {
                bat_speed: *bat_speed,
                attack_angle: *attack_angle,
                time_to_contact: *time_to_contact,
            };
            let outside = input.out_of_range();
            if !outside.is_empty() {
                warn!("outside the usual calculator range: {}", outside.join(", "));
            }
            let swing = metrics::evaluate(&input, &config.swing_score)
                .context("failed to evaluate swing")?;
            if args.json {
                write_json(out, &swing)?;
            } else {
                render::swing(out, &swing)?;
            }
        }
    }
    Ok(())
}

fn data_path(cli: &Option<PathBuf>, configured: PathBuf) -> PathBuf {
    cli.clone().unwrap_or(configured)
}

fn load_hitting(args: &CliArgs, config: &Config) -> anyhow::Result<HittingDataset> {
    let path = data_path(&args.hitting, config.hitting_path());
    let dataset = gac_stats::load_hitting(&path)
        .with_context(|| format!("failed to load hitting data from {}", path.display()))?;
    log_loaded(&path, dataset.len(), dataset.dropped());
    Ok(dataset)
}

fn load_pitching(args: &CliArgs, config: &Config) -> anyhow::Result<PitchingDataset> {
    let path = data_path(&args.pitching, config.pitching_path());
    let dataset = gac_stats::load_pitching(&path)
        .with_context(|| format!("failed to load pitching data from {}", path.display()))?;
    log_loaded(&path, dataset.len(), dataset.dropped());
    Ok(dataset)
}

fn log_loaded(path: &Path, kept: usize, dropped: usize) {
    info!("{}: {} rows kept, {} dropped", path.display(), kept, dropped);
    if kept == 0 {
        warn!("cleaned data from {} is empty; check the CSV file", path.display());
    }
}

fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

/// Initialize tracing to stderr. `RUST_LOG` overrides the configured filter.
fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
