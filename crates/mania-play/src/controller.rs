use std::mem;
use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, info, warn};
use mania_model::{Beatmap, BeatmapMeta, NoteInfo};
use mania_rule::{JudgeTier, JudgeWindows, ScoreState, TIER_COUNT};
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::config::PlayConfig;
use crate::input::{HitEvent, InputSender};
use crate::result::PlayResult;
use crate::timeline::{Outcome, ResolvedNote, Timeline};
use crate::timing_stats::TimingStats;

/// What changed during one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub now_ms: i64,
    /// Notes that became Present, chronological
    pub spawned: Vec<NoteInfo>,
    /// Notes that became Past, in resolution order
    pub resolved: Vec<ResolvedNote>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.resolved.is_empty()
    }
}

/// Per-tick driver for one attempt: spawns notes, judges presses, sweeps
/// misses and feeds every resolution to the score model exactly once.
pub struct Controller<C: Clock = SystemClock> {
    clock: C,
    timeline: Timeline,
    windows: JudgeWindows,
    score: ScoreState,
    timing: TimingStats,
    meta: BeatmapMeta,
    spawn_lookahead_ms: i64,
    started: bool,
    miss_count: u32,
    /// Misses resolved by a direct `hit`, reported on the next tick
    pending: Vec<ResolvedNote>,
    input_tx: Sender<HitEvent>,
    input_rx: Receiver<HitEvent>,
}

impl<C: Clock> Controller<C> {
    pub fn new(beatmap: &Beatmap, config: &PlayConfig, clock: C) -> Self {
        let windows = config.judge_windows_for(beatmap);
        let (input_tx, input_rx) = mpsc::channel();
        debug!(
            "Controller for {} notes, {} keys, windows {:?}",
            beatmap.total_notes(),
            beatmap.key_count(),
            windows.as_array()
        );
        Self {
            clock,
            timeline: Timeline::new(beatmap),
            windows,
            score: ScoreState::with_rules(beatmap.total_notes(), config.score_rules.clone()),
            timing: TimingStats::default(),
            meta: beatmap.meta.clone(),
            spawn_lookahead_ms: config.spawn_lookahead_ms,
            started: false,
            miss_count: 0,
            pending: Vec::new(),
            input_tx,
            input_rx,
        }
    }

    /// Start the clock. Ticks and presses before this are ignored.
    pub fn start(&mut self) {
        if self.started {
            warn!("Controller already started");
            return;
        }
        self.clock.start();
        self.started = true;
        info!(
            "Started {} - {} [{}]",
            self.meta.artist, self.meta.title, self.meta.version
        );
    }

    /// Advance the attempt to the clock's current time.
    ///
    /// Order: spawn due notes, judge queued presses, then sweep misses.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now_ms();
        if !self.started {
            warn!("Tick at {now} ms before start ignored");
            return TickReport {
                now_ms: now,
                ..TickReport::default()
            };
        }

        let spawned = self.timeline.advance(now, self.spawn_lookahead_ms);
        let mut resolved = mem::take(&mut self.pending);

        while let Ok(event) = self.input_rx.try_recv() {
            let at = event.time_ms.min(now);
            self.sweep_column(event.column, at, &mut resolved);
            if let Some(hit) = self.judge_column(event.column, at) {
                resolved.push(hit);
            }
        }

        for column in 0..self.timeline.key_count() {
            self.sweep_column(column, now, &mut resolved);
        }

        debug_assert_eq!(self.timeline.check_partition(), Ok(()));

        if !resolved.is_empty() && self.is_finished() {
            info!(
                "Finished with {} points ({} misses)",
                self.score.final_score(),
                self.miss_count
            );
        }

        TickReport {
            now_ms: now,
            spawned,
            resolved,
        }
    }

    /// Judge a press in `column` at the current time against the earliest
    /// Present note. Returns `None` when nothing was in range.
    ///
    /// Panics if `column` does not exist.
    pub fn hit(&mut self, column: usize) -> Option<ResolvedNote> {
        self.assert_column(column);
        let now = self.clock.now_ms();
        if !self.started {
            warn!("Press in column {column} at {now} ms before start ignored");
            return None;
        }

        let mut missed = Vec::new();
        self.sweep_column(column, now, &mut missed);
        self.pending.extend(missed);
        self.judge_column(column, now)
    }

    /// Handle for queueing presses from another thread.
    pub fn input_sender(&self) -> InputSender {
        InputSender::new(self.input_tx.clone(), self.timeline.key_count())
    }

    fn judge_column(&mut self, column: usize, at: i64) -> Option<ResolvedNote> {
        let Some(note) = self.timeline.earliest_present(column) else {
            debug!("Press in empty column {column} at {at} ms");
            return None;
        };
        let Some(tier) = self.windows.calculate_hit_value(note.hit_time, at) else {
            debug!(
                "Press in column {column} at {at} ms out of range of note at {} ms",
                note.hit_time
            );
            return None;
        };

        let offset_ms = at - note.hit_time;
        self.timeline.resolve(column, note);
        self.score.record(tier);
        self.timing.record(tier, offset_ms);
        debug!(
            "{tier} column {column} note {} ms offset {offset_ms:+} ms",
            note.hit_time
        );
        Some(ResolvedNote {
            note,
            outcome: Outcome::Hit(tier),
            offset_ms,
        })
    }

    fn sweep_column(&mut self, column: usize, at: i64, resolved: &mut Vec<ResolvedNote>) {
        let windows = self.windows;
        let missed = self
            .timeline
            .take_missed(column, |note| windows.is_missed(note.hit_time, at));
        for note in missed {
            self.score.record(Outcome::Missed.tier());
            self.miss_count += 1;
            debug!("MISS column {column} note {} ms", note.hit_time);
            resolved.push(ResolvedNote {
                note,
                outcome: Outcome::Missed,
                offset_ms: at - note.hit_time,
            });
        }
    }

    fn assert_column(&self, column: usize) {
        assert!(
            column < self.timeline.key_count(),
            "column {column} out of range for {} keys",
            self.timeline.key_count()
        );
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True once every note has been hit or missed.
    pub fn is_finished(&self) -> bool {
        self.timeline.is_drained()
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn windows(&self) -> &JudgeWindows {
        &self.windows
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn total_score(&self) -> f64 {
        self.score.total_score()
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.score.accuracy()
    }

    pub fn counts(&self) -> [u32; TIER_COUNT] {
        self.score.counts()
    }

    pub fn count(&self, tier: JudgeTier) -> u32 {
        self.score.count(tier)
    }

    pub fn bonus(&self) -> f64 {
        self.score.bonus()
    }

    pub fn combo(&self) -> u32 {
        self.score.combo()
    }

    pub fn max_combo(&self) -> u32 {
        self.score.max_combo()
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    pub fn timing_stats(&self) -> &TimingStats {
        &self.timing
    }

    pub fn meta(&self) -> &BeatmapMeta {
        &self.meta
    }

    pub fn result(&self) -> PlayResult {
        PlayResult::new(
            &self.meta.title,
            &self.meta.artist,
            &self.meta.version,
            &self.score,
            self.miss_count,
            &self.timing,
        )
    }
}
