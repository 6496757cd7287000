// mania: command-line front end for the play engine.
//
// Loads osu!mania beatmaps, simulates a play and prints the result as JSON.

mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{LevelFilter, info};
use mania_model::{BeatmapDecoder, library};
use mania_play::PlayConfig;

use simulate::Mode;

#[derive(Parser, Debug)]
#[command(name = "mania", about = "osu!mania note scheduler and scoring engine")]
struct Args {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a play of one .osu file and print the result.
    Play {
        /// Path to the .osu file.
        file: PathBuf,

        /// Where the presses come from.
        #[arg(long, value_enum, default_value_t = Mode::Auto)]
        mode: Mode,

        /// JSON press log for replay mode.
        #[arg(long)]
        inputs: Option<PathBuf>,

        /// Seed for jitter mode.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Maximum press offset for jitter mode, in ms.
        #[arg(long, default_value_t = 40)]
        jitter_ms: i64,

        /// Simulated frame length, in ms.
        #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(i64).range(1..))]
        tick_ms: i64,

        /// Path to play config JSON file.
        #[arg(long, env = "MANIA_CONFIG")]
        config: Option<PathBuf>,
    },
    /// List beatmap sets and their difficulties.
    List {
        /// Library directory with one sub-directory per set.
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match args.command {
        Command::Play {
            file,
            mode,
            inputs,
            seed,
            jitter_ms,
            tick_ms,
            config,
        } => play(&file, mode, inputs.as_deref(), seed, jitter_ms, tick_ms, config.as_deref()),
        Command::List { dir } => list(&dir),
    }
}

fn load_config(path: Option<&Path>) -> Result<PlayConfig> {
    match path {
        Some(path) => {
            let config = PlayConfig::read(path)?;
            info!("Loaded play config {}", path.display());
            Ok(config)
        }
        None => Ok(PlayConfig::default()),
    }
}

fn play(
    file: &Path,
    mode: Mode,
    inputs: Option<&Path>,
    seed: u64,
    jitter_ms: i64,
    tick_ms: i64,
    config: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let beatmap = BeatmapDecoder::new(config.key_count).decode(file)?;
    info!(
        "Loaded {} - {} [{}]: {} notes",
        beatmap.meta.artist,
        beatmap.meta.title,
        beatmap.meta.version,
        beatmap.total_notes()
    );

    let presses = match (mode, inputs) {
        (Mode::Auto, _) => simulate::autoplay(&beatmap),
        (Mode::Jitter, _) => simulate::jittered(&beatmap, seed, jitter_ms),
        (Mode::Replay, Some(path)) => simulate::read_replay(path, beatmap.key_count())?,
        (Mode::Replay, None) => bail!("replay mode needs --inputs <file>"),
    };

    let result = simulate::run(&beatmap, &config, &presses, tick_ms)?;
    let json = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
    println!("{json}");
    Ok(())
}

fn list(dir: &Path) -> Result<()> {
    let sets = library::list_beatmap_sets(dir)?;
    if sets.is_empty() {
        info!("No beatmap sets under {}", dir.display());
    }
    for set in sets {
        let name = set
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!("{name}");
        for difficulty in library::list_difficulties(&set)? {
            println!("  [{difficulty}]");
        }
    }
    Ok(())
}
