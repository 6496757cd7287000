use std::fmt;

use serde::{Deserialize, Serialize};

/// Letter grade derived from accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    SS,
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    /// `accuracy` is a ratio in [0, 1].
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 1.0 {
            Grade::SS
        } else if accuracy > 0.95 {
            Grade::S
        } else if accuracy > 0.90 {
            Grade::A
        } else if accuracy > 0.80 {
            Grade::B
        } else if accuracy > 0.70 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Grade::SS => "SS",
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
