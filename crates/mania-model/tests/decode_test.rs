//! File-level decoding tests.

use std::fs;

use mania_model::{BeatmapDecoder, BeatmapError, NoteInfo};
use tempfile::TempDir;

fn osu_file(mode: &str, circle_size: &str, objects: &[&str]) -> String {
    let mut content = format!(
        "osu file format v14\n\n[General]\nAudioFilename: song.mp3\nMode: {mode}\n\n\
         [Metadata]\nTitle:Decode\nArtist:Tester\nVersion:Insane\n\n\
         [Difficulty]\nCircleSize:{circle_size}\nOverallDifficulty:6\n\n[HitObjects]\n"
    );
    for line in objects {
        content.push_str(line);
        content.push('\n');
    }
    content
}

#[test]
fn decode_reads_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Tester - Decode [Insane].osu");
    fs::write(
        &path,
        osu_file(
            "3",
            "4",
            &["64,192,1000,1,0", "192,192,1250,1,0", "448,192,1500,1,0"],
        ),
    )
    .unwrap();

    let map = BeatmapDecoder::default().decode(&path).unwrap();
    assert_eq!(map.key_count(), 4);
    assert_eq!(map.total_notes(), 3);
    assert_eq!(
        map.notes(),
        vec![
            NoteInfo::new(1000, 0),
            NoteInfo::new(1250, 1),
            NoteInfo::new(1500, 3),
        ]
    );
    assert_eq!(map.meta.version, "Insane");
    assert_eq!(map.meta.overall_difficulty, 6.0);
}

#[test]
fn decode_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = BeatmapDecoder::default()
        .decode(&dir.path().join("missing.osu"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("failed to read beatmap"));
}

#[test]
fn decode_error_keeps_typed_cause() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("taiko.osu");
    fs::write(&path, osu_file("1", "4", &["64,192,1000,1,0"])).unwrap();

    let err = BeatmapDecoder::default().decode(&path).unwrap_err();
    assert_eq!(
        err.downcast_ref::<BeatmapError>(),
        Some(&BeatmapError::NotMania {
            mode: "1".to_string()
        })
    );
}

#[test]
fn notes_out_of_order_are_sorted_per_column() {
    let content = osu_file(
        "3",
        "4",
        &["64,192,3000,1,0", "64,192,1000,1,0", "64,192,2000,1,0"],
    );
    let map = BeatmapDecoder::default().decode_str(&content).unwrap();
    let times: Vec<i64> = map.column(0).iter().map(|n| n.hit_time).collect();
    assert_eq!(times, vec![1000, 2000, 3000]);
}

#[test]
fn duplicate_note_is_rejected() {
    let content = osu_file("3", "4", &["64,192,1000,1,0", "100,192,1000,1,0"]);
    assert_eq!(
        BeatmapDecoder::default().decode_str(&content).unwrap_err(),
        BeatmapError::DuplicateNote {
            column: 0,
            hit_time: 1000
        }
    );
}

#[test]
fn seven_key_map_needs_seven_key_decoder() {
    let content = osu_file("3", "7", &["36,192,1000,1,0", "475,192,1000,1,0"]);
    assert!(matches!(
        BeatmapDecoder::default().decode_str(&content),
        Err(BeatmapError::WrongKeyCount { expected: 4, .. })
    ));

    let map = BeatmapDecoder::new(7).decode_str(&content).unwrap();
    assert_eq!(map.column(0).len(), 1);
    assert_eq!(map.column(6).len(), 1);
}

#[test]
fn repeated_property_keeps_last_value() {
    let content = osu_file("3", "4", &["64,192,1000,1,0"])
        .replace("Title:Decode\n", "Title:Decode\nTitle:Other\n");
    let map = BeatmapDecoder::default().decode_str(&content).unwrap();
    assert_eq!(map.meta.title, "Other");
}
