//! course-profile CLI - elevation analysis for race courses
//!
//! Usage:
//!   course-profile waypoints <file.gpx> [--smooth]
//!   course-profile segments <file.gpx> --station "Name@mile"... [--smooth]
//!
//! Output is JSON on stdout; logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use course_profile::{
    read_gpx_file, Checkpoint, ProcessingConfig, ProfileError, Result, TrackEngine,
};
use log::LevelFilter;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "course-profile")]
#[command(about = "Elevation profile and aid-station analysis for GPX courses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Match the file's waypoints to the track and print a summary
    Waypoints {
        /// GPX file to analyse
        file: PathBuf,

        /// Simplify the track between waypoints
        #[arg(long)]
        smooth: bool,
    },

    /// Elevation gain/loss between aid stations
    Segments {
        /// GPX file to analyse
        file: PathBuf,

        /// Aid station as "Name@mile" (repeatable)
        #[arg(short, long = "station", value_parser = parse_station)]
        stations: Vec<Checkpoint>,

        /// Simplify the track between waypoints
        #[arg(long)]
        smooth: bool,
    },
}

/// Parse "Name@mile"; the last '@' separates the mile so names may contain one.
fn parse_station(s: &str) -> std::result::Result<Checkpoint, String> {
    let (name, mile) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("expected Name@mile, got '{}'", s))?;
    let mile: f64 = mile
        .trim()
        .parse()
        .map_err(|_| format!("invalid mile '{}' in '{}'", mile, s))?;
    if !mile.is_finite() || mile < 0.0 {
        return Err(format!("mile must be a non-negative number, got {}", mile));
    }
    Ok(Checkpoint::new(name.trim(), mile))
}

fn engine_for(smooth: bool) -> TrackEngine {
    let config = ProcessingConfig {
        enable_smoothing: smooth,
        ..ProcessingConfig::default()
    };
    TrackEngine::with_config(config)
}

fn track_id(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "track".to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| ProfileError::Internal {
        message: e.to_string(),
    })
}

fn run_waypoints(file: &Path, smooth: bool) -> Result<String> {
    let input = read_gpx_file(file)?;
    let mut engine = engine_for(smooth);
    let summary = engine.process(&track_id(file), &input)?;
    to_json(&summary)
}

fn run_segments(file: &Path, stations: &[Checkpoint], smooth: bool) -> Result<String> {
    let input = read_gpx_file(file)?;
    let id = track_id(file);
    let mut engine = engine_for(smooth);
    engine.process(&id, &input)?;
    let report = engine.calculate(&id, stations)?;
    to_json(&report)
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let result = match &cli.command {
        Commands::Waypoints { file, smooth } => run_waypoints(file, *smooth),
        Commands::Segments {
            file,
            stations,
            smooth,
        } => run_segments(file, stations, *smooth),
    };

    match result {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
