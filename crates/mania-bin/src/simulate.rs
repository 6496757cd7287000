//! Headless play: drives a controller with a manual clock and a planned
//! sequence of presses.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use clap::ValueEnum;
use log::{debug, info};
use mania_model::Beatmap;
use mania_play::{Clock, Controller, HitEvent, ManualClock, PlayConfig, PlayResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where the presses come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Press every note exactly on time
    Auto,
    /// Press every note with a random offset
    Jitter,
    /// Replay presses from a JSON file
    Replay,
}

/// One press per note at its hit time.
pub fn autoplay(beatmap: &Beatmap) -> Vec<HitEvent> {
    beatmap
        .notes()
        .into_iter()
        .map(|note| HitEvent::new(note.column, note.hit_time))
        .collect()
}

/// One press per note, offset uniformly within `±jitter_ms`. The same seed
/// always yields the same presses.
pub fn jittered(beatmap: &Beatmap, seed: u64, jitter_ms: i64) -> Vec<HitEvent> {
    let jitter_ms = jitter_ms.abs();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut presses: Vec<HitEvent> = beatmap
        .notes()
        .into_iter()
        .map(|note| {
            let offset = rng.gen_range(-jitter_ms..=jitter_ms);
            HitEvent::new(note.column, note.hit_time + offset)
        })
        .collect();
    presses.sort_by_key(|p| p.time_ms);
    presses
}

/// Read a JSON array of `{"column": .., "timeMs": ..}` presses.
pub fn read_replay(path: &Path, key_count: usize) -> Result<Vec<HitEvent>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read replay {}", path.display()))?;
    let mut presses: Vec<HitEvent> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse replay {}", path.display()))?;
    for press in &presses {
        ensure!(
            press.column < key_count,
            "replay press in column {} but the beatmap has {key_count} keys",
            press.column
        );
    }
    presses.sort_by_key(|p| p.time_ms);
    Ok(presses)
}

/// Play `beatmap` to the end, delivering `presses` through the input queue
/// and ticking every `tick_ms`.
pub fn run(
    beatmap: &Beatmap,
    config: &PlayConfig,
    presses: &[HitEvent],
    tick_ms: i64,
) -> Result<PlayResult> {
    assert!(tick_ms > 0, "tick step must be positive");

    let clock = ManualClock::new();
    let mut controller = Controller::new(beatmap, config, clock.clone());
    let input = controller.input_sender();
    controller.start();

    let mut next = 0;
    let mut ticks = 0u64;
    while !controller.is_finished() {
        clock.advance(tick_ms);
        let now = clock.now_ms();
        while let Some(press) = presses.get(next).filter(|p| p.time_ms <= now) {
            input
                .send(*press)
                .with_context(|| format!("failed to queue press at {} ms", press.time_ms))?;
            next += 1;
        }
        let report = controller.tick();
        ticks += 1;
        for resolved in &report.resolved {
            debug!("{:?} at {} ms", resolved.outcome, resolved.note.hit_time);
        }
    }

    info!(
        "Simulated {} notes in {ticks} ticks ({} presses delivered)",
        beatmap.total_notes(),
        next
    );
    Ok(controller.result())
}
