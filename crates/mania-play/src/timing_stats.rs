use mania_rule::{JudgeTier, TimingDirection};
use serde::Serialize;

/// Cumulative early/late statistics during gameplay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingStats {
    pub early_count: u32,
    pub late_count: u32,
}

impl TimingStats {
    pub fn record(&mut self, tier: JudgeTier, offset_ms: i64) {
        // Max is close enough to count as on time
        if tier == JudgeTier::Max {
            return;
        }

        match TimingDirection::from_offset(offset_ms) {
            TimingDirection::Early => self.early_count += 1,
            TimingDirection::Late => self.late_count += 1,
            TimingDirection::Exact => {}
        }
    }
}
