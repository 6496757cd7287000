use serde::{Deserialize, Serialize};

/// A single tap note.
///
/// Ordering is by `hit_time` first, then `column`, so a sorted list of notes
/// is in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteInfo {
    /// Ideal hit instant in milliseconds from song start
    pub hit_time: i64,
    /// Column index (0-indexed)
    pub column: usize,
}

impl NoteInfo {
    pub const fn new(hit_time: i64, column: usize) -> Self {
        Self { hit_time, column }
    }
}
