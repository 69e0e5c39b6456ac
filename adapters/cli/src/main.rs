#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Sanity Maze without a window.

mod ascii;
mod config;
mod report;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sanity_maze_core::{GameConfig, InputState};
use sanity_maze_rendering::{
    HudPresentation, MessageBoard, Presentation, RenderingBackend, Scene, TilePalette,
};
use sanity_maze_system_generation::MazeGenerator;
use sanity_maze_system_session::{Autopilot, Phase, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    ascii::AsciiBackend,
    report::{EventRecord, MazeReport, SimulationReport},
};

const VIEWPORT: Vec2 = Vec2::new(1280.0, 768.0);
const WINDOW_TITLE: &str = "Sanity Maze";
/// Mixed into the run seed for presentation-only randomness, which must never
/// consume the simulation's stream.
const PRESENTATION_SEED_SALT: u64 = 0x5eed_5a17_c0ff_ee00;

/// Sanity Maze - explore procedurally generated mazes before your mind gives out
#[derive(Parser, Debug)]
#[command(name = "sanity-maze")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file overriding the default tuning
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a single level and print it
    Generate {
        /// Level to generate (1 or more)
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "ascii")]
        format: OutputFormat,
    },

    /// Let the autopilot play a run and report what happened
    Simulate {
        /// Level the run starts on
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// Frames to simulate
        #[arg(long, default_value = "3600")]
        frames: u32,

        /// Simulated frames per second
        #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..))]
        fps: u32,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "ascii")]
        format: OutputFormat,

        /// Draw the view every N frames
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        render_every: Option<u32>,
    },
}

/// Output format shared by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text.
    Ascii,
    /// Machine-readable JSON.
    Json,
}

struct SimulateOptions {
    level: u32,
    frames: u32,
    fps: u32,
    seed: Option<u64>,
    format: OutputFormat,
    render_every: Option<u32>,
}

/// Entry point for the Sanity Maze command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command {
        Command::Generate {
            level,
            seed,
            format,
        } => generate(&config, level, seed, format, &mut out),
        Command::Simulate {
            level,
            frames,
            fps,
            seed,
            format,
            render_every,
        } => simulate(
            config,
            &SimulateOptions {
                level,
                frames,
                fps,
                seed,
                format,
                render_every,
            },
            &mut out,
        ),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, "seeded random source");
    seed
}

fn generate<W: Write>(
    config: &GameConfig,
    level: u32,
    seed: Option<u64>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let seed = resolve_seed(seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let generator = MazeGenerator::new(config);
    let maze = generator
        .generate(level, &mut rng)
        .with_context(|| format!("failed to generate level {level}"))?;
    let report = MazeReport::new(
        &maze,
        generator.strategy_for(level).name(),
        seed,
        config.tile_size,
    );

    match format {
        OutputFormat::Ascii => report.write_ascii(out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)
                .context("failed to serialise maze report")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn simulate<W: Write>(config: GameConfig, options: &SimulateOptions, out: &mut W) -> Result<()> {
    let seed = resolve_seed(options.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut presentation_rng = ChaCha8Rng::seed_from_u64(seed ^ PRESENTATION_SEED_SALT);
    let tile_size = config.tile_size;
    let mut session = Session::new(config, VIEWPORT).context("failed to create session")?;

    let mut events = Vec::new();
    session
        .start_at(options.level, &mut rng, &mut events)
        .with_context(|| format!("failed to start a run at level {}", options.level))?;

    let frame = Duration::from_secs_f64(1.0 / f64::from(options.fps));
    let mut autopilot = Autopilot::new(tile_size * 0.1);
    let mut board = MessageBoard::default();
    let mut log: Vec<EventRecord> = Vec::new();
    let mut frames_run = 0;

    record(0, &mut events, &mut board, &mut log);
    for index in 1..=options.frames {
        if session.phase() == Phase::GameOver {
            break;
        }
        let input = match (session.maze(), session.player()) {
            (Some(maze), Some(player)) => autopilot.steer(maze, player, tile_size),
            _ => InputState::IDLE,
        };
        session
            .advance(frame, input, &mut rng, &mut events)
            .with_context(|| format!("simulation failed on frame {index}"))?;
        board.advance(frame);
        record(index, &mut events, &mut board, &mut log);
        frames_run = index;

        if options
            .render_every
            .is_some_and(|every| index % every == 0)
        {
            render(&mut session, &board, &mut presentation_rng, &mut *out)?;
        }
    }

    let report = SimulationReport::new(seed, options.level, frames_run, &session, log);
    match options.format {
        OutputFormat::Ascii => report.write_text(out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)
                .context("failed to serialise simulation report")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn record(
    frame: u32,
    events: &mut Vec<sanity_maze_core::Event>,
    board: &mut MessageBoard,
    log: &mut Vec<EventRecord>,
) {
    for event in events.drain(..) {
        board.post(&event);
        log.push(EventRecord::new(frame, &event));
    }
}

fn render<W: Write>(
    session: &mut Session,
    board: &MessageBoard,
    rng: &mut ChaCha8Rng,
    out: &mut W,
) -> Result<()> {
    let Some(frame) = session.visibility_frame() else {
        return Ok(());
    };
    let (Some(player), Some(hud)) = (session.player(), session.hud()) else {
        return Ok(());
    };
    let shake = session
        .screen_shake()
        .map(|shake| shake.offset(rng))
        .unwrap_or_default();

    let scene = Scene::compose(&frame, player, &TilePalette::default(), session.config().tile_size)
        .with_hud(HudPresentation::from_snapshot(&hud))
        .with_message(board.current())
        .with_shake(shake);
    let presentation = Presentation::new(WINDOW_TITLE, Presentation::CLEAR_COLOR, scene);
    AsciiBackend::new(out).present(&presentation)
}
