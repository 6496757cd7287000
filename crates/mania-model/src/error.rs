use thiserror::Error;

/// Reasons a beatmap is rejected at load time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BeatmapError {
    #[error("beatmap is not an osu!mania map (Mode: {mode})")]
    NotMania { mode: String },

    #[error("beatmap is not {expected} keys (CircleSize: {found})")]
    WrongKeyCount { expected: usize, found: String },

    #[error("beatmap does not have an audio file")]
    MissingAudio,

    #[error("malformed hit object on line {line}: {reason}")]
    MalformedHitObject { line: usize, reason: String },

    #[error("column {column} is out of range for a {key_count}-key beatmap")]
    ColumnOutOfRange { column: usize, key_count: usize },

    #[error("two notes share column {column} at {hit_time} ms")]
    DuplicateNote { column: usize, hit_time: i64 },

    #[error("beatmap has no notes")]
    Empty,

    #[error("key count must be at least 1")]
    NoColumns,
}
