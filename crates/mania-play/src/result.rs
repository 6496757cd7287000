use mania_rule::{Grade, JudgeTier, ScoreState, TIER_COUNT};
use serde::Serialize;

use crate::timing_stats::TimingStats;

/// Snapshot of an attempt, suitable for display or JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResult {
    pub title: String,
    pub artist: String,
    pub difficulty: String,
    pub total_notes: usize,
    pub judged_notes: usize,
    /// Per-tier counts, Max..Poor. Misses are included in Poor.
    pub counts: [u32; TIER_COUNT],
    pub miss_count: u32,
    pub max_combo: u32,
    pub score: u64,
    /// `None` when nothing was judged
    pub accuracy: Option<f64>,
    pub grade: Option<Grade>,
    pub early_count: u32,
    pub late_count: u32,
}

impl PlayResult {
    pub(crate) fn new(
        title: &str,
        artist: &str,
        difficulty: &str,
        score: &ScoreState,
        miss_count: u32,
        timing: &TimingStats,
    ) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            difficulty: difficulty.to_string(),
            total_notes: score.total_notes(),
            judged_notes: score.note_index(),
            counts: score.counts(),
            miss_count,
            max_combo: score.max_combo(),
            score: score.final_score(),
            accuracy: score.accuracy(),
            grade: score.grade(),
            early_count: timing.early_count,
            late_count: timing.late_count,
        }
    }

    pub fn count(&self, tier: JudgeTier) -> u32 {
        self.counts[tier.code()]
    }

    /// Every note was judged and none broke the combo.
    pub fn is_full_combo(&self) -> bool {
        self.judged_notes == self.total_notes && self.count(JudgeTier::Poor) == 0
    }
}
