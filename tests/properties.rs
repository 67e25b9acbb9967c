//! Property tests for note selection, merging and frequencies

use approx::assert_relative_eq;
use proptest::prelude::*;

use notedrill::inventory::{merge_with, Dedup};
use notedrill::selector::exclusion_map;
use notedrill::{merge, Note, PitchClass, Selector};

fn pitch_class() -> impl Strategy<Value = PitchClass> {
    proptest::sample::select(PitchClass::ALL.to_vec())
}

fn note() -> impl Strategy<Value = Note> {
    (pitch_class(), -1i32..8).prop_map(|(pitch_class, octave)| Note::new(pitch_class, octave))
}

proptest! {
    #[test]
    fn next_never_repeats(seed in any::<u64>(), size in 2usize..40, steps in 1usize..50) {
        let mut selector = Selector::seeded(seed);
        let mut current = selector.initial(size).unwrap();
        for _ in 0..steps {
            let next = selector.next(current, size).unwrap();
            prop_assert!(next < size);
            prop_assert_ne!(next, current);
            current = next;
        }
    }

    #[test]
    fn exclusion_map_skips_current(current in 0usize..100, r in 0usize..99) {
        prop_assert_ne!(exclusion_map(current, r), current);
        prop_assert!(exclusion_map(current, r) < 100);
    }

    #[test]
    fn merge_keeps_first_occurrences(a in prop::collection::vec(note(), 0..12),
                                     b in prop::collection::vec(note(), 1..12)) {
        let merged = merge(&[a.clone(), b.clone()]).unwrap();

        for (i, x) in merged.iter().enumerate() {
            prop_assert!(merged[i + 1..].iter().all(|y| y != x));
        }
        let mut expected: Vec<Note> = Vec::new();
        for n in a.iter().chain(b.iter()) {
            if !expected.contains(n) {
                expected.push(*n);
            }
        }
        prop_assert_eq!(merged, expected);
    }

    #[test]
    fn pitch_dedup_never_grows(notes in prop::collection::vec(note(), 1..24)) {
        let by_spelling = merge_with(&[notes.clone()], Dedup::Spelling).unwrap();
        let by_pitch = merge_with(&[notes], Dedup::Pitch).unwrap();
        prop_assert!(by_pitch.len() <= by_spelling.len());
    }

    #[test]
    fn octave_up_doubles_frequency(pitch_class in pitch_class(), octave in -2i32..9) {
        let low = Note::new(pitch_class, octave).frequency();
        let high = Note::new(pitch_class, octave + 1).frequency();
        assert_relative_eq!(high, low * 2.0, max_relative = 1e-9);
    }
}
