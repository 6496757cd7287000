use std::collections::VecDeque;

use mania_model::{Beatmap, NoteInfo};
use mania_rule::JudgeTier;
use serde::Serialize;

/// How a note left the Present stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Hit(JudgeTier),
    /// Poor window elapsed without a press
    Missed,
}

impl Outcome {
    /// Tier fed to the score model. Misses score as Poor.
    pub fn tier(self) -> JudgeTier {
        match self {
            Outcome::Hit(tier) => tier,
            Outcome::Missed => JudgeTier::Poor,
        }
    }
}

/// A note that moved from Present to Past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNote {
    pub note: NoteInfo,
    pub outcome: Outcome,
    /// `judged_at - hit_time`; negative is early
    pub offset_ms: i64,
}

/// Future / Present / Past stages of one column.
#[derive(Debug, Clone, Default)]
pub struct ColumnTimeline {
    future: VecDeque<NoteInfo>,
    present: VecDeque<NoteInfo>,
    past: Vec<NoteInfo>,
    total: usize,
}

impl ColumnTimeline {
    fn new(notes: &[NoteInfo]) -> Self {
        Self {
            future: notes.iter().copied().collect(),
            present: VecDeque::new(),
            past: Vec::with_capacity(notes.len()),
            total: notes.len(),
        }
    }

    pub fn future(&self) -> &VecDeque<NoteInfo> {
        &self.future
    }

    pub fn present(&self) -> &VecDeque<NoteInfo> {
        &self.present
    }

    /// Resolved notes in resolution order.
    pub fn past(&self) -> &[NoteInfo] {
        &self.past
    }

    pub fn is_drained(&self) -> bool {
        self.future.is_empty() && self.present.is_empty()
    }
}

/// Per-column note lifecycle for one attempt.
///
/// Notes only ever move forward (Future → Present → Past) and every note
/// is in exactly one stage of its own column.
#[derive(Debug, Clone)]
pub struct Timeline {
    columns: Vec<ColumnTimeline>,
    /// `now + lookahead` of the last `advance`
    horizon: Option<i64>,
}

impl Timeline {
    pub fn new(beatmap: &Beatmap) -> Self {
        Self {
            columns: beatmap
                .columns()
                .iter()
                .map(|notes| ColumnTimeline::new(notes))
                .collect(),
            horizon: None,
        }
    }

    pub fn key_count(&self) -> usize {
        self.columns.len()
    }

    /// Spawn every Future note with `hit_time - now <= lookahead`. Returns
    /// the spawned notes in chronological order.
    pub fn advance(&mut self, now: i64, lookahead: i64) -> Vec<NoteInfo> {
        let horizon = now.saturating_add(lookahead);
        self.horizon = Some(self.horizon.map_or(horizon, |h| h.max(horizon)));

        let mut spawned = Vec::new();
        for column in &mut self.columns {
            while let Some(&note) = column.future.front() {
                if note.hit_time.saturating_sub(now) > lookahead {
                    break;
                }
                column.future.pop_front();
                column.present.push_back(note);
                spawned.push(note);
            }
        }
        spawned.sort_unstable();
        spawned
    }

    pub fn column(&self, column: usize) -> &ColumnTimeline {
        &self.columns[column]
    }

    pub fn columns(&self) -> &[ColumnTimeline] {
        &self.columns
    }

    pub fn column_future(&self, column: usize) -> &VecDeque<NoteInfo> {
        &self.columns[column].future
    }

    pub fn column_present(&self, column: usize) -> &VecDeque<NoteInfo> {
        &self.columns[column].present
    }

    pub fn column_past(&self, column: usize) -> &[NoteInfo] {
        &self.columns[column].past
    }

    /// The note a press in `column` would be judged against.
    pub fn earliest_present(&self, column: usize) -> Option<NoteInfo> {
        self.columns[column].present.front().copied()
    }

    /// Move `note` from Present to Past.
    ///
    /// Panics if `note` is not in Present of `column`.
    pub fn resolve(&mut self, column: usize, note: NoteInfo) {
        let lane = &mut self.columns[column];
        let index = lane
            .present
            .binary_search_by_key(&note.hit_time, |n| n.hit_time)
            .unwrap_or_else(|_| panic!("{note:?} is not present in column {column}"));
        if let Some(removed) = lane.present.remove(index) {
            lane.past.push(removed);
        }
    }

    /// Resolve the leading Present notes of `column` for which `is_missed`
    /// holds. Present is ascending, so the missed notes always form a prefix.
    pub fn take_missed<F>(&mut self, column: usize, is_missed: F) -> Vec<NoteInfo>
    where
        F: Fn(&NoteInfo) -> bool,
    {
        let lane = &mut self.columns[column];
        let mut missed = Vec::new();
        while let Some(note) = lane.present.front() {
            if !is_missed(note) {
                break;
            }
            if let Some(note) = lane.present.pop_front() {
                lane.past.push(note);
                missed.push(note);
            }
        }
        missed
    }

    /// True once no note is waiting to spawn or be resolved.
    pub fn is_drained(&self) -> bool {
        self.columns.iter().all(ColumnTimeline::is_drained)
    }

    pub fn future_len(&self) -> usize {
        self.columns.iter().map(|c| c.future.len()).sum()
    }

    pub fn present_len(&self) -> usize {
        self.columns.iter().map(|c| c.present.len()).sum()
    }

    pub fn past_len(&self) -> usize {
        self.columns.iter().map(|c| c.past.len()).sum()
    }

    /// Verify the stage invariants: per-column counts add up, notes sit in
    /// their own column, Future and Present are ascending, and every Future
    /// note lies beyond the spawn horizon.
    pub fn check_partition(&self) -> Result<(), String> {
        for (index, lane) in self.columns.iter().enumerate() {
            let held = lane.future.len() + lane.present.len() + lane.past.len();
            if held != lane.total {
                return Err(format!(
                    "column {index} holds {held} notes, expected {}",
                    lane.total
                ));
            }

            let all = lane.future.iter().chain(&lane.present).chain(&lane.past);
            if let Some(stray) = all.clone().find(|n| n.column != index) {
                return Err(format!("{stray:?} is stored in column {index}"));
            }

            if !is_ascending(lane.future.iter()) {
                return Err(format!("column {index} future is out of order"));
            }
            if !is_ascending(lane.present.iter()) {
                return Err(format!("column {index} present is out of order"));
            }

            if let (Some(horizon), Some(next)) = (self.horizon, lane.future.front())
                && next.hit_time <= horizon
            {
                return Err(format!(
                    "column {index} future note at {} is inside the spawn horizon {horizon}",
                    next.hit_time
                ));
            }

            let mut times: Vec<i64> = all.map(|n| n.hit_time).collect();
            times.sort_unstable();
            if times.windows(2).any(|w| w[0] == w[1]) {
                return Err(format!("column {index} holds a note twice"));
            }
        }
        Ok(())
    }
}

fn is_ascending<'a>(notes: impl Iterator<Item = &'a NoteInfo>) -> bool {
    let mut last: Option<i64> = None;
    for note in notes {
        if last.is_some_and(|t| t >= note.hit_time) {
            return false;
        }
        last = Some(note.hit_time);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use mania_model::test_support::BeatmapBuilder;

    fn timeline() -> Timeline {
        let map = BeatmapBuilder::new(4)
            .note(0, 1000)
            .note(0, 1200)
            .note(1, 3000)
            .note(3, 500)
            .build();
        Timeline::new(&map)
    }

    #[test]
    fn starts_with_everything_in_future() {
        let tl = timeline();
        assert_eq!(tl.future_len(), 4);
        assert_eq!(tl.present_len(), 0);
        assert_eq!(tl.past_len(), 0);
        assert!(tl.check_partition().is_ok());
    }

    #[test]
    fn advance_spawns_within_lookahead_inclusive() {
        let mut tl = timeline();
        let spawned = tl.advance(0, 1000);
        assert_eq!(spawned, vec![NoteInfo::new(500, 3), NoteInfo::new(1000, 0)]);
        assert_eq!(tl.column_present(0).len(), 1);
        assert_eq!(tl.column_future(0).len(), 1);
        assert!(tl.check_partition().is_ok());

        let spawned = tl.advance(200, 1000);
        assert_eq!(spawned, vec![NoteInfo::new(1200, 0)]);
        assert_eq!(tl.earliest_present(0), Some(NoteInfo::new(1000, 0)));
    }

    #[test]
    fn advance_is_idempotent_at_same_time() {
        let mut tl = timeline();
        tl.advance(0, 1000);
        assert!(tl.advance(0, 1000).is_empty());
    }

    #[test]
    fn resolve_moves_specific_note() {
        let mut tl = timeline();
        tl.advance(500, 1000);
        tl.resolve(0, NoteInfo::new(1200, 0));
        assert_eq!(tl.column_present(0), &[NoteInfo::new(1000, 0)]);
        assert_eq!(tl.column_past(0), &[NoteInfo::new(1200, 0)]);
        assert!(tl.check_partition().is_ok());
    }

    #[test]
    #[should_panic(expected = "is not present")]
    fn resolve_absent_note_panics() {
        let mut tl = timeline();
        tl.resolve(1, NoteInfo::new(3000, 1));
    }

    #[test]
    fn take_missed_pops_prefix_only() {
        let mut tl = timeline();
        tl.advance(500, 1000);
        let missed = tl.take_missed(0, |n| n.hit_time < 1100);
        assert_eq!(missed, vec![NoteInfo::new(1000, 0)]);
        assert_eq!(tl.column_present(0), &[NoteInfo::new(1200, 0)]);
        assert!(tl.take_missed(0, |n| n.hit_time < 1100).is_empty());
    }

    #[test]
    fn drained_after_everything_resolves() {
        let mut tl = timeline();
        tl.advance(10_000, 1000);
        for column in 0..tl.key_count() {
            tl.take_missed(column, |_| true);
        }
        assert!(tl.is_drained());
        assert_eq!(tl.past_len(), 4);
        assert!(tl.check_partition().is_ok());
    }

    #[test]
    fn outcome_tier_scores_misses_as_poor() {
        assert_eq!(Outcome::Missed.tier(), JudgeTier::Poor);
        assert_eq!(Outcome::Hit(JudgeTier::Great).tier(), JudgeTier::Great);
    }
}
