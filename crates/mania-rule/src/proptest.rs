//! Property-based tests for windows and the score recurrence.

use proptest::prelude::*;

use crate::{JudgeTier, JudgeWindows, ScoreState};

fn arb_tier() -> impl Strategy<Value = JudgeTier> {
    (0usize..6).prop_map(|code| JudgeTier::ALL[code])
}

prop_compose! {
    fn arb_windows()(
        steps in prop::array::uniform6(1i64..80),
    ) -> JudgeWindows {
        let mut windows = [0i64; 6];
        let mut acc = 0;
        for (slot, step) in windows.iter_mut().zip(steps) {
            acc += step;
            *slot = acc;
        }
        JudgeWindows::new(windows).unwrap()
    }
}

proptest! {
    #[test]
    fn bonus_stays_in_range(tiers in prop::collection::vec(arb_tier(), 1..300)) {
        let mut state = ScoreState::new(tiers.len());
        for tier in tiers {
            state.record(tier);
            prop_assert!((0.0..=100.0).contains(&state.bonus()));
        }
    }

    #[test]
    fn accuracy_is_a_ratio(tiers in prop::collection::vec(arb_tier(), 1..300)) {
        let mut state = ScoreState::new(tiers.len());
        for tier in tiers {
            state.record(tier);
        }
        let accuracy = state.accuracy().unwrap();
        prop_assert!((0.0..=1.0).contains(&accuracy));
    }

    #[test]
    fn all_max_run_hits_budget(n in 1usize..5000) {
        let mut state = ScoreState::new(n);
        for _ in 0..n {
            state.record(JudgeTier::Max);
        }
        prop_assert!((state.total_score() - 1_000_000.0).abs() < 1e-3);
        prop_assert_eq!(state.final_score(), 1_000_000);
        prop_assert_eq!(state.max_combo() as usize, n);
    }

    #[test]
    fn recompute_agrees_with_running_total(tiers in prop::collection::vec(arb_tier(), 1..300)) {
        let mut state = ScoreState::new(tiers.len());
        for tier in tiers {
            state.record(tier);
        }
        prop_assert!((state.recompute_total() - state.total_score()).abs() < 1e-6);
    }

    #[test]
    fn is_missed_is_monotonic(
        windows in arb_windows(),
        hit_time in -100_000i64..100_000,
        t in -100_000i64..100_000,
        dt in 0i64..10_000,
    ) {
        if windows.is_missed(hit_time, t) {
            prop_assert!(windows.is_missed(hit_time, t + dt));
        }
    }

    #[test]
    fn judgement_is_symmetric(windows in arb_windows(), offset in 0i64..1000) {
        prop_assert_eq!(windows.judge_offset(offset), windows.judge_offset(-offset));
        prop_assert_eq!(
            windows.calculate_hit_value(5_000, 5_000 + offset),
            windows.calculate_hit_value(5_000, 5_000 - offset)
        );
    }

    #[test]
    fn missed_notes_cannot_be_judged(windows in arb_windows(), offset in -1000i64..1000) {
        if windows.is_missed(0, offset) {
            prop_assert_eq!(windows.calculate_hit_value(0, offset), None);
        }
    }

    #[test]
    fn wider_offsets_never_judge_better(windows in arb_windows(), a in 0i64..600, b in 0i64..600) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        match (windows.judge_offset(near), windows.judge_offset(far)) {
            (Some(n), Some(f)) => prop_assert!(n <= f),
            (None, Some(_)) => prop_assert!(false, "near offset unjudged but far judged"),
            _ => {}
        }
    }
}
