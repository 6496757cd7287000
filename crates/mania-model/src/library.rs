//! Beatmap set discovery.
//!
//! A beatmap library is a directory of sets, one sub-directory per set,
//! conventionally named `"<id> <Artist> - <Title>"`. Each set holds one
//! `.osu` file per difficulty, named `"<Artist> - <Title> [<Difficulty>].osu"`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

const OSU_EXTENSION: &str = "osu";

/// Sub-directories of `root` that contain at least one `.osu` file,
/// sorted by directory name. Other files, such as a background image, are
/// not required.
pub fn list_beatmap_sets(root: &Path) -> Result<Vec<PathBuf>> {
    let mut sets = Vec::new();
    for entry in read_dir_sorted(root)? {
        if !entry.is_dir() {
            continue;
        }
        match osu_files(&entry) {
            Ok(files) if !files.is_empty() => sets.push(entry),
            Ok(_) => {}
            Err(e) => debug!("skip {}: {e:#}", entry.display()),
        }
    }
    Ok(sets)
}

/// Difficulty names of every `.osu` file in a set, in file-name order.
pub fn list_difficulties(set: &Path) -> Result<Vec<String>> {
    Ok(osu_files(set)?
        .iter()
        .filter_map(|path| path.file_name()?.to_str().map(difficulty_name))
        .map(str::to_string)
        .collect())
}

/// The `.osu` file in `set` whose difficulty name matches `difficulty`,
/// ignoring case.
pub fn find_by_difficulty(set: &Path, difficulty: &str) -> Result<Option<PathBuf>> {
    Ok(osu_files(set)?.into_iter().find(|path| {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| difficulty_name(name).eq_ignore_ascii_case(difficulty))
    }))
}

/// The set directory under `root` whose leading space-separated token is `id`.
pub fn find_set_by_id(root: &Path, id: &str) -> Result<Option<PathBuf>> {
    Ok(read_dir_sorted(root)?.into_iter().find(|path| {
        path.is_dir()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|name| name.split(' ').next())
                .is_some_and(|token| token == id)
    }))
}

/// Text inside the last `[...]` of a file name, or the name without its
/// extension when there are no brackets.
pub fn difficulty_name(file_name: &str) -> &str {
    let stem = file_name
        .strip_suffix(".osu")
        .unwrap_or(file_name);
    match stem.rfind('[') {
        Some(open) => {
            let inner = &stem[open + 1..];
            inner.split(']').next().unwrap_or(inner)
        }
        None => stem,
    }
}

fn osu_files(set: &Path) -> Result<Vec<PathBuf>> {
    Ok(read_dir_sorted(set)?
        .into_iter()
        .filter(|path| path.is_file() && is_osu_file(path))
        .collect())
}

fn is_osu_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(OSU_EXTENSION))
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list directory {}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        paths.push(entry?.path());
    }
    paths.sort();
    Ok(paths)
}
