use std::path::Path;

use anyhow::{Context, Result};
use mania_model::{Beatmap, DEFAULT_KEY_COUNT};
use mania_rule::{JudgeWindows, ScoreRules};
use serde::{Deserialize, Serialize};

pub const SPAWN_LOOKAHEAD_MIN: i64 = 0;
pub const SPAWN_LOOKAHEAD_MAX: i64 = 10_000;
pub const KEY_COUNT_MIN: usize = 1;
pub const KEY_COUNT_MAX: usize = 18;
pub const OVERALL_DIFFICULTY_MIN: f64 = 0.0;
pub const OVERALL_DIFFICULTY_MAX: f64 = 10.0;

/// Settings for one play session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct PlayConfig {
    /// How far ahead of its hit time a note becomes Present
    pub spawn_lookahead_ms: i64,
    /// Expected key count of loaded beatmaps
    pub key_count: usize,
    /// Overrides the beatmap's OverallDifficulty
    pub overall_difficulty: Option<f64>,
    /// Explicit windows; take precedence over any difficulty
    pub judge_windows: Option<JudgeWindows>,
    pub score_rules: ScoreRules,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            spawn_lookahead_ms: 1000,
            key_count: DEFAULT_KEY_COUNT,
            overall_difficulty: None,
            judge_windows: None,
            score_rules: ScoreRules::default(),
        }
    }
}

impl PlayConfig {
    pub fn validate(&mut self) {
        self.spawn_lookahead_ms = self
            .spawn_lookahead_ms
            .clamp(SPAWN_LOOKAHEAD_MIN, SPAWN_LOOKAHEAD_MAX);
        self.key_count = self.key_count.clamp(KEY_COUNT_MIN, KEY_COUNT_MAX);
        self.overall_difficulty = self
            .overall_difficulty
            .filter(|od| od.is_finite())
            .map(|od| od.clamp(OVERALL_DIFFICULTY_MIN, OVERALL_DIFFICULTY_MAX));
        self.score_rules.validate();
    }

    /// Windows for `beatmap`: explicit windows, else the configured
    /// difficulty, else the beatmap's own.
    pub fn judge_windows_for(&self, beatmap: &Beatmap) -> JudgeWindows {
        if let Some(windows) = self.judge_windows {
            return windows;
        }
        let od = self
            .overall_difficulty
            .unwrap_or(beatmap.meta.overall_difficulty);
        JudgeWindows::from_overall_difficulty(od)
    }

    /// Read config from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: PlayConfig = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate();
        Ok(config)
    }

    /// Write config to a JSON file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
