use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::beatmap::{Beatmap, BeatmapMeta};
use crate::error::BeatmapError;
use crate::note::NoteInfo;
use crate::{DEFAULT_KEY_COUNT, PLAYFIELD_WIDTH};

const HIT_OBJECTS_SECTION: &str = "[HitObjects]";
const MANIA_MODE: &str = "3";

/// Decoder for osu!mania `.osu` beatmaps.
///
/// Only the parts the play engine needs are read: header properties and the
/// `[HitObjects]` section. Hold notes are treated as taps at their start time.
#[derive(Debug, Clone, Copy)]
pub struct BeatmapDecoder {
    key_count: usize,
}

impl BeatmapDecoder {
    /// Create a decoder that accepts only `key_count`-key beatmaps.
    pub fn new(key_count: usize) -> Self {
        Self { key_count }
    }

    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Read and validate a `.osu` file.
    pub fn decode(&self, path: &Path) -> Result<Beatmap> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read beatmap {}", path.display()))?;
        let beatmap = self
            .decode_str(&content)
            .with_context(|| format!("invalid beatmap {}", path.display()))?;
        debug!(
            "Decoded {} ({} notes, {} keys)",
            path.display(),
            beatmap.total_notes(),
            beatmap.key_count()
        );
        Ok(beatmap)
    }

    /// Parse and validate `.osu` content.
    pub fn decode_str(&self, content: &str) -> Result<Beatmap, BeatmapError> {
        if self.key_count == 0 {
            return Err(BeatmapError::NoColumns);
        }

        let content = content.trim_start_matches('\u{feff}');
        let properties = read_properties(content);
        self.validate_properties(&properties)?;

        let mut notes = Vec::new();
        let mut in_hit_objects = false;
        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if !in_hit_objects {
                in_hit_objects = line == HIT_OBJECTS_SECTION;
                continue;
            }
            if line.starts_with('[') {
                break;
            }
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            notes.push(parse_hit_object(line, index + 1, self.key_count)?);
        }

        Beatmap::from_notes(self.key_count, notes, meta_from(&properties))
    }

    fn validate_properties(&self, properties: &HashMap<String, String>) -> Result<(), BeatmapError> {
        // osu! treats a missing Mode as standard (0).
        let mode = properties.get("Mode").map(String::as_str).unwrap_or("0");
        if mode != MANIA_MODE {
            return Err(BeatmapError::NotMania {
                mode: mode.to_string(),
            });
        }

        // CircleSize is the key count in mania mode.
        let circle_size = properties.get("CircleSize").map(String::as_str);
        let key_count_matches = circle_size
            .and_then(|cs| cs.parse::<f64>().ok())
            .is_some_and(|cs| cs == self.key_count as f64);
        if !key_count_matches {
            return Err(BeatmapError::WrongKeyCount {
                expected: self.key_count,
                found: circle_size.unwrap_or("<missing>").to_string(),
            });
        }

        if properties
            .get("AudioFilename")
            .is_none_or(|name| name.is_empty())
        {
            return Err(BeatmapError::MissingAudio);
        }

        Ok(())
    }
}

impl Default for BeatmapDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_COUNT)
    }
}

/// Collect `Key: Value` lines that appear before `[HitObjects]`.
/// A repeated key keeps its last value.
pub(crate) fn read_properties(content: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    for raw in content.lines() {
        let line = raw.trim();
        if line == HIT_OBJECTS_SECTION {
            break;
        }
        if line.starts_with('[') || line.starts_with("//") {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            properties.insert(key.to_string(), value.trim().to_string());
        }
    }
    properties
}

fn meta_from(properties: &HashMap<String, String>) -> BeatmapMeta {
    let text = |key: &str| properties.get(key).cloned().unwrap_or_default();
    let overall_difficulty = properties
        .get("OverallDifficulty")
        .and_then(|od| od.parse::<f64>().ok())
        .filter(|od| od.is_finite())
        .map(|od| od.clamp(0.0, 10.0))
        .unwrap_or(BeatmapMeta::DEFAULT_OVERALL_DIFFICULTY);

    BeatmapMeta {
        title: text("Title"),
        artist: text("Artist"),
        version: text("Version"),
        audio_filename: text("AudioFilename"),
        overall_difficulty,
    }
}

/// Parse `x,y,time,type,...` into a note.
fn parse_hit_object(line: &str, line_no: usize, key_count: usize) -> Result<NoteInfo, BeatmapError> {
    let malformed = |reason: String| BeatmapError::MalformedHitObject {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 3 {
        return Err(malformed(format!(
            "expected at least 3 fields, found {}",
            fields.len()
        )));
    }

    let x: i32 = fields[0]
        .parse()
        .map_err(|_| malformed(format!("invalid x position {:?}", fields[0])))?;
    let hit_time: i64 = fields[2]
        .parse()
        .map_err(|_| malformed(format!("invalid time {:?}", fields[2])))?;

    Ok(NoteInfo::new(hit_time, column_for_x(x.into(), key_count)))
}

/// Map an osu!pixel x position onto a column: `floor(x * keys / 512)`,
/// clamped into range.
pub fn column_for_x(x: i64, key_count: usize) -> usize {
    let keys = key_count as i64;
    let x = x.clamp(0, PLAYFIELD_WIDTH - 1);
    (x * keys / PLAYFIELD_WIDTH).clamp(0, keys - 1) as usize
}
