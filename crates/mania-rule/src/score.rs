use log::warn;
use serde::{Deserialize, Serialize};

use crate::TIER_COUNT;
use crate::grade::Grade;
use crate::tier::JudgeTier;

/// Score tables, indexed by tier code (Max..Poor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct ScoreRules {
    /// Base score per tier
    pub base_values: [u32; TIER_COUNT],
    /// Change applied to the bonus before scoring the note
    pub bonus_deltas: [i32; TIER_COUNT],
    /// Multiplier on `sqrt(bonus)` per tier
    pub bonus_weights: [u32; TIER_COUNT],
    /// Accuracy contribution per tier; `accuracy_weights[Max]` is the
    /// denominator per judged note
    pub accuracy_weights: [u32; TIER_COUNT],
    /// Score of a run where every note is Max
    pub score_budget: u32,
    /// Bonus before the first note, in [0, 100]
    pub initial_bonus: f64,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            base_values: [320, 300, 200, 100, 50, 0],
            bonus_deltas: [2, 1, -8, -24, -44, -100],
            bonus_weights: [32, 32, 16, 8, 4, 0],
            accuracy_weights: [300, 300, 200, 100, 50, 0],
            score_budget: 1_000_000,
            initial_bonus: ScoreRules::MAX_BONUS,
        }
    }
}

impl ScoreRules {
    pub const MIN_BONUS: f64 = 0.0;
    pub const MAX_BONUS: f64 = 100.0;

    /// Clamp out-of-range values back into a usable state.
    pub fn validate(&mut self) {
        let defaults = Self::default();
        if self.base_values[JudgeTier::Max.code()] == 0 {
            warn!("Max base value must be positive, using default tables");
            self.base_values = defaults.base_values;
        }
        if self.accuracy_weights[JudgeTier::Max.code()] == 0 {
            warn!("Max accuracy weight must be positive, using default weights");
            self.accuracy_weights = defaults.accuracy_weights;
        }
        if self.score_budget == 0 {
            self.score_budget = defaults.score_budget;
        }
        if !self.initial_bonus.is_finite() {
            self.initial_bonus = defaults.initial_bonus;
        }
        self.initial_bonus = self.initial_bonus.clamp(Self::MIN_BONUS, Self::MAX_BONUS);
    }

    /// `clamp(0, 100, bonus + delta[tier])`
    pub fn next_bonus(&self, bonus: f64, tier: JudgeTier) -> f64 {
        (bonus + self.bonus_deltas[tier.code()] as f64).clamp(Self::MIN_BONUS, Self::MAX_BONUS)
    }

    /// Score for one note given the bonus after applying its delta.
    pub fn hit_score(&self, half_note_ratio: f64, bonus: f64, tier: JudgeTier) -> f64 {
        let code = tier.code();
        let base = half_note_ratio * self.base_values[code] as f64;
        let bonus_score = half_note_ratio * self.bonus_weights[code] as f64 * bonus.sqrt();
        base + bonus_score
    }

    /// Per-attempt normalisation: `budget / 2 / total_notes / base[Max]`.
    pub fn half_note_ratio(&self, total_notes: usize) -> f64 {
        self.score_budget as f64
            / 2.0
            / total_notes as f64
            / self.base_values[JudgeTier::Max.code()] as f64
    }
}

/// Running score for one attempt.
///
/// Fed exactly one tier per judged or missed note, in chronological order.
#[derive(Debug, Clone)]
pub struct ScoreState {
    rules: ScoreRules,
    total_notes: usize,
    half_note_ratio: f64,
    counts: [u32; TIER_COUNT],
    hit_order: Vec<JudgeTier>,
    bonus: f64,
    total_score: f64,
    combo: u32,
    max_combo: u32,
}

impl ScoreState {
    /// Panics if `total_notes` is zero.
    pub fn new(total_notes: usize) -> Self {
        Self::with_rules(total_notes, ScoreRules::default())
    }

    /// Unusable rules are repaired with [`ScoreRules::validate`] first.
    ///
    /// Panics if `total_notes` is zero.
    pub fn with_rules(total_notes: usize, mut rules: ScoreRules) -> Self {
        assert!(total_notes > 0, "score state needs at least one note");
        rules.validate();
        let half_note_ratio = rules.half_note_ratio(total_notes);
        Self {
            bonus: rules.initial_bonus,
            rules,
            total_notes,
            half_note_ratio,
            counts: [0; TIER_COUNT],
            hit_order: Vec::with_capacity(total_notes),
            total_score: 0.0,
            combo: 0,
            max_combo: 0,
        }
    }

    /// Fold one judgement into the score. Returns the score it earned.
    pub fn record(&mut self, tier: JudgeTier) -> f64 {
        debug_assert!(
            self.hit_order.len() < self.total_notes,
            "more judgements than notes"
        );
        self.bonus = self.rules.next_bonus(self.bonus, tier);
        let delta = self.rules.hit_score(self.half_note_ratio, self.bonus, tier);
        self.total_score += delta;

        self.counts[tier.code()] += 1;
        self.hit_order.push(tier);

        if tier.breaks_combo() {
            self.combo = 0;
        } else {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        }
        delta
    }

    pub fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    pub fn total_notes(&self) -> usize {
        self.total_notes
    }

    pub fn counts(&self) -> [u32; TIER_COUNT] {
        self.counts
    }

    pub fn count(&self, tier: JudgeTier) -> u32 {
        self.counts[tier.code()]
    }

    /// Every recorded tier, oldest first.
    pub fn hit_order(&self) -> &[JudgeTier] {
        &self.hit_order
    }

    /// Notes judged so far.
    pub fn note_index(&self) -> usize {
        self.hit_order.len()
    }

    pub fn bonus(&self) -> f64 {
        self.bonus
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn half_note_ratio(&self) -> f64 {
        self.half_note_ratio
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Weighted accuracy in [0, 1]. `None` before the first judgement.
    pub fn accuracy(&self) -> Option<f64> {
        let judged = self.note_index();
        if judged == 0 {
            return None;
        }
        let weights = &self.rules.accuracy_weights;
        let earned: u64 = self
            .counts
            .iter()
            .zip(weights.iter())
            .map(|(&count, &weight)| count as u64 * weight as u64)
            .sum();
        let possible = weights[JudgeTier::Max.code()] as u64 * judged as u64;
        Some(earned as f64 / possible as f64)
    }

    /// Total score rounded to the nearest point.
    pub fn final_score(&self) -> u64 {
        self.total_score.round() as u64
    }

    /// Replay `hit_order` from the initial bonus. Equals `total_score()`
    /// up to float rounding.
    pub fn recompute_total(&self) -> f64 {
        let mut bonus = self.rules.initial_bonus;
        let mut total = 0.0;
        for &tier in &self.hit_order {
            bonus = self.rules.next_bonus(bonus, tier);
            total += self.rules.hit_score(self.half_note_ratio, bonus, tier);
        }
        total
    }

    pub fn grade(&self) -> Option<Grade> {
        self.accuracy().map(Grade::from_accuracy)
    }

    /// True once every note has been judged or missed.
    pub fn is_complete(&self) -> bool {
        self.note_index() == self.total_notes
    }
}
