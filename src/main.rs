//! Prize Wheel - Main Entry Point
//!
//! Loads a wheel definition, then spins it in the terminal against the real
//! clock or simulates weighted draws without animation.

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tokio::time::MissedTickBehavior;
use tracing::{info, trace, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prize_wheel::{
    animation::{Easing, FrameOutcome, FrameQueue, SpinDriver, SpinOutcome, SpinResult, SystemClock},
    config::{CliArgs, WheelSettings},
    selection::{pick_weighted_with, selection_odds},
    validation::validate,
    wheel::{PointerPosition, Segment},
    NAME, VERSION,
};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Print the startup banner
fn print_banner() {
    println!(
        r#"
{cyan}{bold}  ___     _           __      ___           _
 | _ \_ _(_)______    \ \    / / |_  ___ ___| |
 |  _/ '_| |_ / -_)    \ \/\/ /| ' \/ -_) -_) |
 |_| |_| |_/__\___|     \_/\_/ |_||_\___\___|_|
{reset}
{dim}  Weighted spins, exact landings{reset}
{dim}  Version: {version}{reset}
"#,
        cyan = colors::CYAN,
        bold = colors::BOLD,
        reset = colors::RESET,
        dim = colors::DIM,
        version = VERSION
    );
}

/// Print the wheel that is about to spin
fn print_wheel_summary(settings: &WheelSettings, segments: &[Segment]) {
    println!(
        "{bold}{blue}Wheel:{reset}",
        bold = colors::BOLD,
        blue = colors::BLUE,
        reset = colors::RESET
    );
    println!(
        "  {dim}Animation:{reset}      {}ms, {}, {} turns",
        settings.animation.duration_ms,
        settings.animation.easing,
        settings.animation.spins,
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Pointer:{reset}        {}",
        settings.pointer.position,
        dim = colors::DIM,
        reset = colors::RESET
    );
    if settings.disabled {
        println!(
            "  {dim}State:{reset}          {red}disabled{reset}",
            dim = colors::DIM,
            red = colors::RED,
            reset = colors::RESET
        );
    }
    if let Some(ref target) = settings.predefined_result {
        println!(
            "  {dim}Forced result:{reset}  {}",
            target,
            dim = colors::DIM,
            reset = colors::RESET
        );
    }

    let odds = selection_odds(segments);
    for (segment, chance) in segments.iter().zip(odds) {
        let state = if segment.disabled {
            format!("{dim}disabled{reset}", dim = colors::DIM, reset = colors::RESET)
        } else {
            format!("{:5.1}%", chance * 100.0)
        };
        println!(
            "  {magenta}{:>8}{reset}  {:<24} {}",
            segment.id,
            segment.text,
            state,
            magenta = colors::MAGENTA,
            reset = colors::RESET
        );
    }

    println!();
}

/// Built-in wheel used when the configuration defines no segments
fn demo_segments() -> Vec<Segment> {
    vec![
        Segment::new("jackpot", "Jackpot", "#ffd700").with_weight(0.5),
        Segment::new("free-spin", "Free Spin", "#4caf50").with_weight(2.0),
        Segment::new("ten-off", "10% Off", "#2196f3").with_weight(3.0),
        Segment::new("gift", "Mystery Gift", "#9c27b0"),
        Segment::new("twenty-off", "20% Off", "#ff9800").with_weight(1.5),
        Segment::new("nothing", "Try Again", "#9e9e9e").with_weight(3.0),
    ]
}

/// Build the CLI command parser
fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .author("Prize Wheel Team")
        .about("Spin a weighted prize wheel in the terminal")
        .long_about(
            "Prize Wheel spins a configurable wheel of segments:\n\
             - Weighted random selection over enabled segments\n\
             - Forced results by segment index or id\n\
             - Time-based easing animation\n\
             - TOML/JSON wheel definitions",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to wheel definition (TOML or JSON)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("rounds")
                .short('n')
                .long("rounds")
                .value_name("COUNT")
                .help("Number of spins to perform")
                .default_value("1")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("turns")
                .long("turns")
                .value_name("COUNT")
                .help("Full rotations per spin (default: 5)")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("duration")
                .short('d')
                .long("duration")
                .value_name("MS")
                .help("Spin duration in milliseconds (default: 3000)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("easing")
                .short('e')
                .long("easing")
                .value_name("CURVE")
                .help("Easing curve")
                .value_parser(["linear", "ease-in", "ease-out", "ease-in-out"]),
        )
        .arg(
            Arg::new("pointer")
                .short('p')
                .long("pointer")
                .value_name("POSITION")
                .help("Pointer position")
                .value_parser(["top", "right", "bottom", "left"]),
        )
        .arg(
            Arg::new("target-index")
                .long("target-index")
                .value_name("INDEX")
                .help("Force every spin onto the segment at INDEX")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("target-id")
                .long("target-id")
                .value_name("ID")
                .help("Force every spin onto the segment with ID")
                .conflicts_with("target-index"),
        )
        .arg(
            Arg::new("disabled")
                .long("disabled")
                .help("Load the wheel disabled so spin requests are refused")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fps")
                .long("fps")
                .value_name("RATE")
                .help("Frames per second")
                .default_value("60")
                .value_parser(clap::value_parser!(u32).range(1..=240)),
        )
        .arg(
            Arg::new("simulate")
                .long("simulate")
                .value_name("DRAWS")
                .help("Draw DRAWS weighted picks without animation and compare with the expected odds")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON lines")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress output except errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

/// Parse CLI arguments into CliArgs struct
fn parse_cli_args(matches: &clap::ArgMatches) -> CliArgs {
    let mut args = CliArgs::default();

    args.config_file = matches.get_one::<PathBuf>("config").cloned();
    args.spins = matches.get_one::<u32>("turns").copied();
    args.duration_ms = matches.get_one::<u64>("duration").copied();
    args.target_index = matches.get_one::<usize>("target-index").copied();
    args.target_id = matches.get_one::<String>("target-id").cloned();
    args.disabled = matches.get_flag("disabled").then_some(true);

    // Both value lists are restricted by clap, parsing cannot fail here
    args.easing = matches
        .get_one::<String>("easing")
        .and_then(|s| s.parse::<Easing>().ok());
    args.pointer = matches
        .get_one::<String>("pointer")
        .and_then(|s| s.parse::<PointerPosition>().ok());

    args
}

/// Initialize the tracing/logging subsystem
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Draw `draws` weighted picks and print observed against expected shares
fn run_simulation(segments: &[Segment], draws: usize, json: bool) -> Result<()> {
    let mut rng = rand::thread_rng();
    let mut counts = vec![0usize; segments.len()];

    for _ in 0..draws {
        let picked = pick_weighted_with(segments, &mut rng).context("Weighted draw failed")?;
        counts[picked.index] += 1;
    }

    let odds = selection_odds(segments);
    for ((segment, count), expected) in segments.iter().zip(&counts).zip(odds) {
        let observed = if draws > 0 {
            *count as f64 / draws as f64
        } else {
            0.0
        };

        if json {
            let line = serde_json::json!({
                "id": segment.id,
                "text": segment.text,
                "count": count,
                "observed": observed,
                "expected": expected,
            });
            println!("{}", line);
        } else {
            println!(
                "  {magenta}{:>8}{reset}  {:<24} {:>8}  {:6.2}%  {dim}(expected {:6.2}%){reset}",
                segment.id,
                segment.text,
                count,
                observed * 100.0,
                expected * 100.0,
                magenta = colors::MAGENTA,
                dim = colors::DIM,
                reset = colors::RESET
            );
        }
    }

    Ok(())
}

/// Print one completed spin
fn print_result(round: u32, result: &SpinResult, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string(result).context("Failed to serialize spin result")?
        );
    } else {
        println!(
            "{green}{bold}Round {}:{reset} {} {dim}(id {}, index {}, {:.1}°, {:.0}ms){reset}",
            round,
            result.segment.text,
            result.segment.id,
            result.index,
            result.angle,
            result.duration_ms,
            green = colors::GREEN,
            bold = colors::BOLD,
            dim = colors::DIM,
            reset = colors::RESET
        );
    }
    Ok(())
}

/// Spin the wheel `rounds` times, delivering frames at `fps`
async fn run_spins(settings: &WheelSettings, rounds: u32, fps: u32, json: bool) -> Result<()> {
    let frames = FrameQueue::new();
    let mut driver = SpinDriver::new(settings, SystemClock::new(), frames.clone());

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps.max(1))));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);

    for round in 1..=rounds {
        let ticket = match driver.spin().context("Spin failed")? {
            SpinOutcome::Started(ticket) => ticket,
            SpinOutcome::Ignored(reason) => bail!("Spin was ignored: {:?}", reason),
        };
        info!(round, spin_id = %ticket.spin_id(), "Spinning");

        while driver.is_spinning() {
            tokio::select! {
                _ = ticker.tick() => {
                    for frame in frames.take_pending() {
                        if let FrameOutcome::Advanced { progress } = driver.on_frame(frame) {
                            trace!(progress, rotation = driver.rotation(), "Tick");
                        }
                    }
                }
                _ = &mut shutdown => {
                    println!();
                    warn!("Received shutdown signal, resetting wheel");
                    driver.reset();
                    return Ok(());
                }
            }
        }

        let result = ticket.wait().await.context("Spin did not complete")?;
        print_result(round, &result, json)?;
    }

    Ok(())
}

/// Main application entry point
#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let verbosity = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");
    let json = matches.get_flag("json");

    init_tracing(verbosity, quiet);

    let cli_args = parse_cli_args(&matches);

    // Load configuration with full precedence chain
    let mut settings = cli_args
        .load_settings()
        .context("Failed to load configuration")?;

    if settings.segments.is_empty() {
        info!("No segments configured, using the demo wheel");
        settings.segments = demo_segments();
    }

    let report = validate(&settings.segments);
    if !report.is_valid() {
        for message in report.messages() {
            eprintln!(
                "{red}error:{reset} {}",
                message,
                red = colors::RED,
                reset = colors::RESET
            );
        }
        bail!("Wheel configuration has {} error(s)", report.errors.len());
    }

    if !quiet && !json {
        print_banner();
        print_wheel_summary(&settings, &report.segments);
    }

    if let Some(draws) = matches.get_one::<usize>("simulate").copied() {
        return run_simulation(&report.segments, draws, json);
    }

    let rounds = matches.get_one::<u32>("rounds").copied().unwrap_or(1);
    let fps = matches.get_one::<u32>("fps").copied().unwrap_or(60);

    run_spins(&settings, rounds, fps, json).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cmd = build_cli();

        let matches = cmd
            .clone()
            .try_get_matches_from(["prize-wheel", "--json", "--rounds", "3"])
            .unwrap();

        assert!(matches.get_flag("json"));
        assert_eq!(matches.get_one::<u32>("rounds"), Some(&3));
        assert_eq!(matches.get_one::<u32>("fps"), Some(&60));
    }

    #[test]
    fn test_cli_rejects_unknown_easing() {
        let result = build_cli().try_get_matches_from(["prize-wheel", "--easing", "bounce"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_conflicts() {
        let result = build_cli().try_get_matches_from([
            "prize-wheel",
            "--target-index",
            "1",
            "--target-id",
            "gift",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cli_args() {
        let matches = build_cli()
            .try_get_matches_from([
                "prize-wheel",
                "--turns",
                "7",
                "--duration",
                "1200",
                "--easing",
                "ease-in-out",
                "--pointer",
                "left",
                "--target-id",
                "gift",
            ])
            .unwrap();

        let args = parse_cli_args(&matches);

        assert_eq!(args.spins, Some(7));
        assert_eq!(args.duration_ms, Some(1200));
        assert_eq!(args.easing, Some(Easing::EaseInOut));
        assert_eq!(args.pointer, Some(PointerPosition::Left));
        assert_eq!(args.target_id.as_deref(), Some("gift"));
        assert_eq!(args.target_index, None);
        assert_eq!(args.disabled, None);
    }

    #[test]
    fn test_disabled_flag_reaches_settings() {
        let matches = build_cli()
            .try_get_matches_from(["prize-wheel", "--disabled"])
            .unwrap();

        let args = parse_cli_args(&matches);
        assert_eq!(args.disabled, Some(true));

        let settings = WheelSettings::default()
            .with_segments(demo_segments())
            .merge_with_args(&args);
        assert!(settings.disabled);

        let mut driver = SpinDriver::new(&settings, SystemClock::new(), FrameQueue::new());
        assert!(!driver.spin().unwrap().is_started());
    }

    #[test]
    fn test_demo_segments_are_valid() {
        assert!(validate(&demo_segments()).is_valid());
    }
}
