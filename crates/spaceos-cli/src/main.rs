//! spaceos: Space Vehicle OS, a simulated telemetry dashboard for the terminal.

mod error;
mod tui;

use std::thread;
use std::time::Duration;

use clap::Parser;
use spaceos_core::{RngNoise, VehicleTelemetry};

use error::{REMEDIES, StartupError};
use tui::app::{App, AppConfig};

/// Pause between startup banner steps.
const INTRO_STEP: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "spaceos")]
#[command(about = "Space Vehicle OS: simulated telemetry dashboard. Press Ctrl+C to exit.")]
#[command(version = spaceos_core::VERSION)]
struct Cli {
    /// Refresh interval in seconds
    #[arg(long, default_value = "0.5")]
    refresh: f64,

    /// Seed for the telemetry generator (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames instead of running until Ctrl+C
    #[arg(long)]
    frames: Option<u64>,

    /// Disable colors (also honoured via the NO_COLOR environment variable)
    #[arg(long)]
    plain: bool,

    /// Skip the startup banner and its delays
    #[arg(long)]
    skip_intro: bool,

    /// Text shown in the CURRENT TASKS line
    #[arg(long, default_value = "None")]
    task: String,

    /// Location label shown in the header
    #[arg(long, default_value = "BULAN")]
    location: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        eprintln!();
        eprintln!("To fix this error:");
        for (i, tip) in REMEDIES.iter().enumerate() {
            eprintln!("{}. {tip}", i + 1);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), StartupError> {
    let refresh = parse_refresh(cli.refresh)?;
    let colored = !cli.plain && !no_color_requested(std::env::var_os("NO_COLOR"));

    if !cli.skip_intro {
        intro();
    }

    let mut telemetry = VehicleTelemetry::default();
    telemetry.vehicle.current_task = cli.task;

    let config = AppConfig {
        refresh,
        max_frames: cli.frames,
        colored,
        location: cli.location,
    };
    log::info!("starting with seed {:?}, colored {colored}", cli.seed);

    match cli.seed {
        Some(seed) => App::new(telemetry, RngNoise::seeded(seed), config).run(),
        None => App::new(telemetry, RngNoise::from_entropy(), config).run(),
    }
}

fn intro() {
    println!("Starting Space Vehicle Operating System...");
    println!("Initializing systems...");
    thread::sleep(INTRO_STEP);
    println!("Loading interface...");
    thread::sleep(INTRO_STEP);
}

/// Seconds to a positive, finite [`Duration`].
fn parse_refresh(secs: f64) -> Result<Duration, StartupError> {
    if secs <= 0.0 {
        return Err(StartupError::InvalidRefresh(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| StartupError::InvalidRefresh(secs))
}

/// `NO_COLOR` disables color when set to any non-empty value.
fn no_color_requested(value: Option<std::ffi::OsString>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
