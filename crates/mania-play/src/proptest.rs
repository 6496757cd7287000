//! Property-based tests for the scheduler.
//!
//! Random beatmaps are driven by random sequences of clock steps, direct
//! presses and queued presses. After every step the stage partition must
//! hold and every resolved note must have been scored exactly once.

use std::collections::BTreeSet;

use mania_model::test_support::BeatmapBuilder;
use mania_model::{Beatmap, NoteInfo};
use proptest::prelude::*;

use crate::{Clock, Controller, HitEvent, ManualClock, Outcome, PlayConfig};

#[derive(Debug, Clone)]
enum Step {
    Advance(i64),
    Press(usize),
    Queue(usize, i64),
}

fn arb_beatmap() -> impl Strategy<Value = Beatmap> {
    (1usize..=7).prop_flat_map(|key_count| {
        prop::collection::btree_set((0..key_count, 0i64..20_000), 1..60).prop_map(
            move |notes: BTreeSet<(usize, i64)>| {
                let mut builder = BeatmapBuilder::new(key_count);
                for (column, time) in notes {
                    builder = builder.note(column, time);
                }
                builder.build()
            },
        )
    })
}

fn arb_steps(key_count: usize) -> impl Strategy<Value = Vec<Step>> {
    let step = prop_oneof![
        (1i64..400).prop_map(Step::Advance),
        (0..key_count).prop_map(Step::Press),
        (0..key_count, -300i64..300).prop_map(|(c, d)| Step::Queue(c, d)),
    ];
    prop::collection::vec(step, 1..300)
}

fn arb_session() -> impl Strategy<Value = (Beatmap, Vec<Step>)> {
    arb_beatmap().prop_flat_map(|map| {
        let steps = arb_steps(map.key_count());
        (Just(map), steps)
    })
}

fn is_ascending(notes: &[NoteInfo]) -> bool {
    notes.windows(2).all(|w| w[0].hit_time < w[1].hit_time)
}

proptest! {
    #[test]
    fn partition_and_single_resolution_hold((map, steps) in arb_session()) {
        let clock = ManualClock::new();
        let mut controller = Controller::new(&map, &PlayConfig::default(), clock.clone());
        let input = controller.input_sender();
        controller.start();

        let mut seen = BTreeSet::new();
        let mut record = |resolved: NoteInfo| seen.insert(resolved);

        for step in steps {
            match step {
                Step::Advance(dt) => {
                    clock.advance(dt);
                    let report = controller.tick();
                    for r in &report.resolved {
                        prop_assert!(record(r.note), "{:?} resolved twice", r.note);
                    }
                }
                Step::Press(column) => {
                    if let Some(r) = controller.hit(column) {
                        prop_assert!(matches!(r.outcome, Outcome::Hit(_)));
                        prop_assert!(record(r.note), "{:?} resolved twice", r.note);
                    }
                }
                Step::Queue(column, delta) => {
                    input.send(HitEvent::new(column, clock.now_ms() + delta)).unwrap();
                }
            }

            let timeline = controller.timeline();
            prop_assert_eq!(timeline.check_partition(), Ok(()));
            for column in 0..timeline.key_count() {
                let present: Vec<NoteInfo> =
                    timeline.column_present(column).iter().copied().collect();
                prop_assert!(is_ascending(&present));
            }
            prop_assert_eq!(controller.score().note_index(), timeline.past_len());
            prop_assert!((0.0..=100.0).contains(&controller.bonus()));
        }
    }

    #[test]
    fn idle_run_misses_every_note_once(map in arb_beatmap()) {
        let clock = ManualClock::new();
        let mut controller = Controller::new(&map, &PlayConfig::default(), clock.clone());
        controller.start();

        let mut misses = 0;
        while !controller.is_finished() {
            clock.advance(97);
            let report = controller.tick();
            misses += report
                .resolved
                .iter()
                .filter(|r| r.outcome == Outcome::Missed)
                .count();
        }
        prop_assert_eq!(misses, map.total_notes());
        prop_assert_eq!(controller.miss_count() as usize, map.total_notes());
        prop_assert_eq!(controller.accuracy(), Some(0.0));

        clock.advance(10_000);
        prop_assert!(controller.tick().resolved.is_empty());
    }
}
