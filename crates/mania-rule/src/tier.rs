use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete judgement outcome, best to worst. The discriminant is the tier
/// code used to index score tables and per-tier counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JudgeTier {
    Max = 0,
    Great = 1,
    Cool = 2,
    Good = 3,
    Bad = 4,
    Poor = 5,
}

impl JudgeTier {
    /// All tiers from tightest window to widest.
    pub const ALL: [JudgeTier; crate::TIER_COUNT] = [
        Self::Max,
        Self::Great,
        Self::Cool,
        Self::Good,
        Self::Bad,
        Self::Poor,
    ];

    pub const fn code(self) -> usize {
        self as usize
    }

    pub fn from_code(code: usize) -> Option<Self> {
        Self::ALL.get(code).copied()
    }

    /// Poor (including auto-missed notes) resets the combo.
    pub fn breaks_combo(self) -> bool {
        matches!(self, Self::Poor)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Max => "MAX",
            Self::Great => "GREAT",
            Self::Cool => "COOL",
            Self::Good => "GOOD",
            Self::Bad => "BAD",
            Self::Poor => "POOR",
        }
    }
}

impl fmt::Display for JudgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
