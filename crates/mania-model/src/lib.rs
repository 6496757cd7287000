// osu!mania beatmap model: notes, per-column charts, .osu decoder, library scan

mod beatmap;
mod decode;
mod error;
pub mod library;
mod note;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use beatmap::{Beatmap, BeatmapMeta};
pub use decode::{BeatmapDecoder, column_for_x};
pub use error::BeatmapError;
pub use note::NoteInfo;

/// Key count used when nothing else is configured.
pub const DEFAULT_KEY_COUNT: usize = 4;

/// Width of the osu! playfield in osu!pixels. Hit-object x positions are
/// mapped onto columns across this width.
pub const PLAYFIELD_WIDTH: i64 = 512;
