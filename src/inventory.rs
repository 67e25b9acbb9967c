//! # Inventory Builder
//!
//! Turns one or more named note ranges into the ordered, duplicate-free set of notes a
//! drill session picks from.
//!
//! ## Merging
//! [`merge`] keeps the first range intact and then appends, range by range, every note
//! that is not already present. The first occurrence wins, so the resulting order only
//! depends on the input order. Session indices point into this order, which is why it
//! must never change once built.
//!
//! ## Presets
//! Open-string ranges of a four-string bass guitar, each seven natural notes up from
//! the open string:
//!
//! | Preset | Notes |
//! |---|---|
//! | `E` | E1 F1 G1 A1 B1 C2 D2 |
//! | `A` | A1 B1 C2 D2 E2 F2 G2 |
//! | `D` | D2 E2 F2 G2 A2 B2 C3 |
//! | `G` | G2 A2 B2 C3 D3 E3 F3 |
//!
//! ## Example
//! ```rust
//! use notedrill::inventory::{preset, Dedup, Inventory};
//!
//! let ranges = vec![preset("E").unwrap(), preset("A").unwrap()];
//! let inventory = Inventory::from_ranges(&ranges, Dedup::Spelling).unwrap();
//!
//! // A1, B1, C2 and D2 appear in both strings but only once in the inventory
//! assert_eq!(inventory.len(), 10);
//! ```

use std::str::FromStr;

use crate::error::{DrillError, Result};
use crate::note::{Note, PitchClass};

/// How two notes are judged to be the same entry when merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dedup {
    /// Same spelling and octave (`C#3` and `Db3` are both kept)
    #[default]
    Spelling,
    /// Same sounding pitch (`Db3` is dropped if `C#3` came first)
    Pitch,
}

impl FromStr for Dedup {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spelling" => Ok(Dedup::Spelling),
            "pitch" => Ok(Dedup::Pitch),
            other => Err(DrillError::Config(format!(
                "Invalid dedup rule '{}' (expected spelling or pitch)",
                other
            ))),
        }
    }
}

impl Dedup {
    fn matches(self, a: &Note, b: &Note) -> bool {
        match self {
            Dedup::Spelling => a == b,
            Dedup::Pitch => a.same_pitch(b),
        }
    }
}

/// A named run of notes, e.g. the playable range of one instrument string
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRange {
    pub name: String,
    pub notes: Vec<Note>,
}

impl NoteRange {
    pub fn new(name: impl Into<String>, notes: Vec<Note>) -> Self {
        Self {
            name: name.into(),
            notes,
        }
    }

    /// `span` natural notes starting at `open`
    ///
    /// An accidental `open` note is kept as the first entry; the run continues on the
    /// naturals above it.
    pub fn diatonic(name: impl Into<String>, open: Note, span: usize) -> Self {
        let notes = std::iter::successors(Some(open), |note| Some(note.next_natural()))
            .take(span)
            .collect();
        Self::new(name, notes)
    }
}

/// Notes per string in the bass presets
const STRING_SPAN: usize = 7;

const PRESETS: [(&str, PitchClass, i32); 4] = [
    ("E", PitchClass::E, 1),
    ("A", PitchClass::A, 1),
    ("D", PitchClass::D, 2),
    ("G", PitchClass::G, 2),
];

fn open_string(&(name, pitch_class, octave): &(&str, PitchClass, i32)) -> NoteRange {
    NoteRange::diatonic(name, Note::new(pitch_class, octave), STRING_SPAN)
}

/// Names of the built-in ranges, lowest string first
pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, _, _)| *name).collect()
}

/// The lowest string, used when no ranges are configured
pub fn default_range() -> NoteRange {
    open_string(&PRESETS[0])
}

/// Look up a built-in range by name (case-insensitive)
pub fn preset(name: &str) -> Result<NoteRange> {
    let trimmed = name.trim();
    PRESETS
        .iter()
        .find(|(preset, _, _)| preset.eq_ignore_ascii_case(trimmed))
        .map(open_string)
        .ok_or_else(|| {
            DrillError::Config(format!(
                "Unknown range preset '{}' (expected one of: {})",
                trimmed,
                preset_names().join(", ")
            ))
        })
}

/// Merge note sequences, dropping notes already present (by spelling)
pub fn merge(inventories: &[Vec<Note>]) -> Result<Vec<Note>> {
    merge_with(inventories, Dedup::Spelling)
}

/// Merge note sequences with an explicit dedup rule
///
/// Fails with [`DrillError::EmptyInventory`] when there is nothing to merge or the
/// merge yields no notes.
pub fn merge_with(inventories: &[Vec<Note>], dedup: Dedup) -> Result<Vec<Note>> {
    let (first, rest) = inventories.split_first().ok_or(DrillError::EmptyInventory)?;

    let mut merged: Vec<Note> = Vec::new();
    for note in first.iter().chain(rest.iter().flatten()) {
        if !merged.iter().any(|existing| dedup.matches(existing, note)) {
            merged.push(*note);
        }
    }

    if merged.is_empty() {
        return Err(DrillError::EmptyInventory);
    }
    Ok(merged)
}

/// The ordered, non-empty set of notes a session draws from
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    notes: Vec<Note>,
}

impl Inventory {
    /// Build from notes that are already unique; duplicates are still removed
    pub fn new(notes: Vec<Note>) -> Result<Self> {
        let notes = merge(&[notes])?;
        Ok(Self { notes })
    }

    pub fn from_ranges(ranges: &[NoteRange], dedup: Dedup) -> Result<Self> {
        let sources: Vec<Vec<Note>> = ranges.iter().map(|range| range.notes.clone()).collect();
        let notes = merge_with(&sources, dedup)?;
        log::debug!(
            "Built inventory of {} notes from {} range(s)",
            notes.len(),
            ranges.len()
        );
        Ok(Self { notes })
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(text: &str) -> Note {
        text.parse().unwrap()
    }

    fn notes(texts: &[&str]) -> Vec<Note> {
        texts.iter().map(|t| n(t)).collect()
    }

    #[test]
    fn test_merge_keeps_first_occurrence_position() {
        let a = notes(&["E1", "F1", "G1"]);
        let b = notes(&["A1", "F1", "B1"]);
        let merged = merge(&[a, b]).unwrap();
        assert_eq!(merged, notes(&["E1", "F1", "G1", "A1", "B1"]));
        assert_eq!(merged.iter().filter(|note| **note == n("F1")).count(), 1);
    }

    #[test]
    fn test_merge_drops_duplicates_inside_first_inventory() {
        let merged = merge(&[notes(&["E1", "E1", "F1"])]).unwrap();
        assert_eq!(merged, notes(&["E1", "F1"]));
    }

    #[test]
    fn test_merge_keeps_enharmonic_spellings_by_default() {
        let merged = merge(&[notes(&["C#3"]), notes(&["Db3"])]).unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_by_pitch_collapses_enharmonics() {
        let merged = merge_with(
            &[notes(&["C#3", "D3"]), notes(&["Db3", "Db4"])],
            Dedup::Pitch,
        )
        .unwrap();
        assert_eq!(merged, notes(&["C#3", "D3", "Db4"]));
    }

    #[test]
    fn test_merge_empty_input_is_error() {
        assert!(matches!(merge(&[]), Err(DrillError::EmptyInventory)));
        assert!(matches!(merge(&[vec![], vec![]]), Err(DrillError::EmptyInventory)));
    }

    #[test]
    fn test_merge_is_deterministic() {
        let sources = vec![preset("G").unwrap().notes, preset("D").unwrap().notes];
        assert_eq!(merge(&sources).unwrap(), merge(&sources).unwrap());
    }

    #[test]
    fn test_presets_match_bass_strings() {
        assert_eq!(
            preset("E").unwrap().notes,
            notes(&["E1", "F1", "G1", "A1", "B1", "C2", "D2"])
        );
        assert_eq!(
            preset("a").unwrap().notes,
            notes(&["A1", "B1", "C2", "D2", "E2", "F2", "G2"])
        );
        assert_eq!(
            preset("D").unwrap().notes,
            notes(&["D2", "E2", "F2", "G2", "A2", "B2", "C3"])
        );
        assert_eq!(
            preset("G").unwrap().notes,
            notes(&["G2", "A2", "B2", "C3", "D3", "E3", "F3"])
        );
    }

    #[test]
    fn test_unknown_preset_is_config_error() {
        match preset("B") {
            Err(DrillError::Config(message)) => assert!(message.contains("E, A, D, G")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_all_strings_inventory() {
        let ranges: Vec<NoteRange> = preset_names()
            .into_iter()
            .map(|p| preset(p).unwrap())
            .collect();
        let inventory = Inventory::from_ranges(&ranges, Dedup::Spelling).unwrap();
        // E1 up to F3 on naturals
        assert_eq!(inventory.len(), 16);
        assert_eq!(inventory.get(0), Some(&n("E1")));
        assert_eq!(inventory.get(15), Some(&n("F3")));
        assert_eq!(inventory.get(16), None);
    }

    #[test]
    fn test_diatonic_from_accidental() {
        let range = NoteRange::diatonic("x", n("F#1"), 3);
        assert_eq!(range.notes, notes(&["F#1", "G1", "A1"]));
    }
}
