use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TIER_COUNT;
use crate::tier::JudgeTier;

/// Rejected window configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("{tier} window must be positive, got {value} ms")]
    NotPositive { tier: JudgeTier, value: i64 },

    #[error("{tier} window ({value} ms) must be wider than the previous tier ({previous} ms)")]
    NotIncreasing {
        tier: JudgeTier,
        value: i64,
        previous: i64,
    },
}

/// Symmetric hit windows: `windows[tier]` is the largest `|offset|` in ms
/// that still earns `tier`. Strictly increasing from Max to Poor.
///
/// Offsets are `current_time - hit_time`, so negative means early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[i64; 6]", into = "[i64; 6]")]
pub struct JudgeWindows {
    windows: [i64; TIER_COUNT],
}

impl JudgeWindows {
    pub const DEFAULT_OVERALL_DIFFICULTY: f64 = 5.0;

    /// Validate and wrap explicit half-widths (Max..Poor).
    pub fn new(windows: [i64; TIER_COUNT]) -> Result<Self, WindowError> {
        let mut previous = 0;
        for (tier, &value) in JudgeTier::ALL.iter().zip(windows.iter()) {
            if value <= 0 {
                return Err(WindowError::NotPositive { tier: *tier, value });
            }
            if value <= previous {
                return Err(WindowError::NotIncreasing {
                    tier: *tier,
                    value,
                    previous,
                });
            }
            previous = value;
        }
        Ok(Self { windows })
    }

    /// osu!mania windows for an OverallDifficulty in [0, 10]. Out-of-range
    /// values are clamped.
    pub fn from_overall_difficulty(od: f64) -> Self {
        let od = if od.is_finite() {
            od.clamp(0.0, 10.0)
        } else {
            Self::DEFAULT_OVERALL_DIFFICULTY
        };
        let scaled = |base: f64| (base - 3.0 * od).floor() as i64;
        Self {
            windows: [
                16,
                scaled(64.0),
                scaled(97.0),
                scaled(127.0),
                scaled(151.0),
                scaled(188.0),
            ],
        }
    }

    pub fn window(&self, tier: JudgeTier) -> i64 {
        self.windows[tier.code()]
    }

    /// Outer bound of every judgement; later than this a note is missed.
    pub fn poor_window(&self) -> i64 {
        self.windows[JudgeTier::Poor.code()]
    }

    pub fn as_array(&self) -> [i64; TIER_COUNT] {
        self.windows
    }

    /// True once the note's Poor window has fully elapsed. Monotonic in
    /// `current_time`.
    pub fn is_missed(&self, hit_time: i64, current_time: i64) -> bool {
        current_time.saturating_sub(hit_time) > self.poor_window()
    }

    /// Tier for a press at `current_time` against a note at `hit_time`, or
    /// `None` when the press is outside every window.
    pub fn calculate_hit_value(&self, hit_time: i64, current_time: i64) -> Option<JudgeTier> {
        self.judge_offset(current_time.saturating_sub(hit_time))
    }

    /// Tier for a signed offset. The tightest window that contains
    /// `|offset|` wins, so each boundary belongs to the better tier.
    pub fn judge_offset(&self, offset_ms: i64) -> Option<JudgeTier> {
        let distance = offset_ms.unsigned_abs();
        JudgeTier::ALL
            .into_iter()
            .find(|tier| distance <= self.window(*tier) as u64)
    }
}

impl Default for JudgeWindows {
    fn default() -> Self {
        Self::from_overall_difficulty(Self::DEFAULT_OVERALL_DIFFICULTY)
    }
}

impl TryFrom<[i64; TIER_COUNT]> for JudgeWindows {
    type Error = WindowError;

    fn try_from(windows: [i64; TIER_COUNT]) -> Result<Self, Self::Error> {
        Self::new(windows)
    }
}

impl From<JudgeWindows> for [i64; TIER_COUNT] {
    fn from(windows: JudgeWindows) -> Self {
        windows.windows
    }
}

/// Timing direction for the early/late display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingDirection {
    Early,
    Exact,
    Late,
}

impl TimingDirection {
    const EXACT_THRESHOLD_MS: i64 = 1;

    pub fn from_offset(offset_ms: i64) -> Self {
        if offset_ms < -Self::EXACT_THRESHOLD_MS {
            TimingDirection::Early
        } else if offset_ms > Self::EXACT_THRESHOLD_MS {
            TimingDirection::Late
        } else {
            TimingDirection::Exact
        }
    }
}
