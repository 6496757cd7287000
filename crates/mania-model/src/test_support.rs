//! Fixture builders for beatmaps and `.osu` text, shared with downstream
//! crates through the `test-support` feature.

use crate::beatmap::{Beatmap, BeatmapMeta};
use crate::note::NoteInfo;
use crate::{DEFAULT_KEY_COUNT, PLAYFIELD_WIDTH};

/// Fluent builder for in-memory beatmaps.
#[derive(Debug, Clone)]
pub struct BeatmapBuilder {
    key_count: usize,
    notes: Vec<NoteInfo>,
    meta: BeatmapMeta,
}

impl BeatmapBuilder {
    pub fn new(key_count: usize) -> Self {
        Self {
            key_count,
            notes: Vec::new(),
            meta: BeatmapMeta {
                title: "Fixture".to_string(),
                artist: "Test".to_string(),
                version: "Normal".to_string(),
                audio_filename: "audio.mp3".to_string(),
                ..BeatmapMeta::default()
            },
        }
    }

    /// Add a tap note.
    pub fn note(mut self, column: usize, hit_time: i64) -> Self {
        self.notes.push(NoteInfo::new(hit_time, column));
        self
    }

    /// Add `count` notes in one column, `interval_ms` apart, starting at `start_ms`.
    pub fn stream(mut self, column: usize, start_ms: i64, interval_ms: i64, count: usize) -> Self {
        for i in 0..count as i64 {
            self.notes.push(NoteInfo::new(start_ms + i * interval_ms, column));
        }
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.meta.title = title.to_string();
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.meta.version = version.to_string();
        self
    }

    pub fn overall_difficulty(mut self, od: f64) -> Self {
        self.meta.overall_difficulty = od;
        self
    }

    pub fn notes(&self) -> &[NoteInfo] {
        &self.notes
    }

    /// Build the beatmap. Panics on invalid fixtures.
    pub fn build(self) -> Beatmap {
        Beatmap::from_notes(self.key_count, self.notes, self.meta)
            .unwrap_or_else(|e| panic!("invalid fixture beatmap: {e}"))
    }

    /// Render the fixture as `.osu` text.
    pub fn to_osu(&self) -> String {
        osu_text(self.key_count, &self.notes, &self.meta)
    }
}

impl Default for BeatmapBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_COUNT)
    }
}

/// Center x position of a column in osu!pixels.
pub fn column_x(column: usize, key_count: usize) -> i64 {
    let width = PLAYFIELD_WIDTH / key_count as i64;
    width * column as i64 + width / 2
}

/// Minimal valid osu!mania file containing `notes`.
pub fn osu_text(key_count: usize, notes: &[NoteInfo], meta: &BeatmapMeta) -> String {
    let mut out = format!(
        "osu file format v14\n\
         \n\
         [General]\n\
         AudioFilename: {audio}\n\
         AudioLeadIn: 0\n\
         Mode: 3\n\
         \n\
         [Metadata]\n\
         Title:{title}\n\
         Artist:{artist}\n\
         Version:{version}\n\
         \n\
         [Difficulty]\n\
         HPDrainRate:8\n\
         CircleSize:{key_count}\n\
         OverallDifficulty:{od}\n\
         \n\
         [HitObjects]\n",
        audio = meta.audio_filename,
        title = meta.title,
        artist = meta.artist,
        version = meta.version,
        od = meta.overall_difficulty,
    );
    for note in notes {
        out.push_str(&format!(
            "{},192,{},1,0,0:0:0:0:\n",
            column_x(note.column, key_count),
            note.hit_time
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{BeatmapDecoder, column_for_x};

    #[test]
    fn column_x_maps_back_to_column() {
        for key_count in 1..=10 {
            for column in 0..key_count {
                assert_eq!(column_for_x(column_x(column, key_count), key_count), column);
            }
        }
    }

    #[test]
    fn osu_text_decodes_to_same_beatmap() {
        let builder = BeatmapBuilder::new(7)
            .stream(0, 500, 250, 4)
            .note(6, 900)
            .overall_difficulty(7.5);
        let text = builder.to_osu();
        let decoded = BeatmapDecoder::new(7).decode_str(&text).unwrap();
        assert_eq!(decoded, builder.build());
    }
}
