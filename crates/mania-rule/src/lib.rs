// Judgement tiers, hit windows, score recurrence and grades

mod grade;
mod judge;
#[cfg(test)]
mod proptest;
mod score;
mod tier;

pub use grade::Grade;
pub use judge::{JudgeWindows, TimingDirection, WindowError};
pub use score::{ScoreRules, ScoreState};
pub use tier::JudgeTier;

/// Number of judgement tiers: Max, Great, Cool, Good, Bad, Poor.
pub const TIER_COUNT: usize = 6;
