use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::BeatmapError;
use crate::note::NoteInfo;

/// Descriptive header fields carried along with the notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatmapMeta {
    pub title: String,
    pub artist: String,
    /// Difficulty name, e.g. "Hard"
    pub version: String,
    pub audio_filename: String,
    /// OverallDifficulty header value, clamped to [0, 10]
    pub overall_difficulty: f64,
}

impl BeatmapMeta {
    pub const DEFAULT_OVERALL_DIFFICULTY: f64 = 5.0;
}

impl Default for BeatmapMeta {
    fn default() -> Self {
        Self {
            title: String::new(),
            artist: String::new(),
            version: String::new(),
            audio_filename: String::new(),
            overall_difficulty: Self::DEFAULT_OVERALL_DIFFICULTY,
        }
    }
}

/// A validated chart: notes bucketed per column, each column ascending by
/// hit time, with no duplicate (column, hit_time) pairs and at least one note.
#[derive(Debug, Clone, PartialEq)]
pub struct Beatmap {
    pub meta: BeatmapMeta,
    columns: Vec<Vec<NoteInfo>>,
}

impl Beatmap {
    /// Build a beatmap from notes in any order.
    pub fn from_notes<I>(key_count: usize, notes: I, meta: BeatmapMeta) -> Result<Self, BeatmapError>
    where
        I: IntoIterator<Item = NoteInfo>,
    {
        if key_count == 0 {
            return Err(BeatmapError::NoColumns);
        }

        let mut columns: Vec<Vec<NoteInfo>> = vec![Vec::new(); key_count];
        let mut seen = HashSet::new();
        for note in notes {
            if note.column >= key_count {
                return Err(BeatmapError::ColumnOutOfRange {
                    column: note.column,
                    key_count,
                });
            }
            if !seen.insert((note.column, note.hit_time)) {
                return Err(BeatmapError::DuplicateNote {
                    column: note.column,
                    hit_time: note.hit_time,
                });
            }
            columns[note.column].push(note);
        }

        if seen.is_empty() {
            return Err(BeatmapError::Empty);
        }

        for column in &mut columns {
            column.sort_unstable_by_key(|n| n.hit_time);
        }

        Ok(Self { meta, columns })
    }

    pub fn key_count(&self) -> usize {
        self.columns.len()
    }

    /// Notes of one column, ascending by hit time.
    ///
    /// Panics if `column` is out of range.
    pub fn column(&self, column: usize) -> &[NoteInfo] {
        &self.columns[column]
    }

    pub fn columns(&self) -> &[Vec<NoteInfo>] {
        &self.columns
    }

    pub fn total_notes(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// All notes across columns in chronological order.
    pub fn notes(&self) -> Vec<NoteInfo> {
        let mut all: Vec<NoteInfo> = self.columns.iter().flatten().copied().collect();
        all.sort_unstable();
        all
    }

    pub fn first_hit_time(&self) -> Option<i64> {
        self.columns
            .iter()
            .filter_map(|c| c.first())
            .map(|n| n.hit_time)
            .min()
    }

    pub fn last_hit_time(&self) -> Option<i64> {
        self.columns
            .iter()
            .filter_map(|c| c.last())
            .map(|n| n.hit_time)
            .max()
    }
}
