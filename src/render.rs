//! # Rendering Adapter
//!
//! Converts a [`Note`] into what the sinks consume: a playback frequency, a label and
//! an ABC notation token for the staff.
//!
//! ## ABC Encoding
//! ABC writes the octave into the letter case and a suffix. Converting to scientific
//! octaves first (`s = octave + 1`, so the reference octave 3 is ABC's uppercase row):
//!
//! | Scientific octave | Form | Example |
//! |---|---|---|
//! | s <= 4 | uppercase + `4 - s` commas | `E1` -> `E,,` |
//! | s >= 5 | lowercase + `s - 5` apostrophes | `C5` -> `c'` |
//!
//! Accidentals are prefixed: `^` sharp, `_` flat, nothing for naturals.
//!
//! ## Notation Window
//! Only octaves in [`NOTATION_OCTAVES`] are rendered as written. Notes outside the window
//! follow the configured [`OctavePolicy`]: clamp into the window (the default), or fail
//! with [`DrillError::NotationOutOfRange`]. Playback frequency is never affected.

use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{DrillError, Result};
use crate::note::{Accidental, Note};

/// Octaves (reference numbering) that render without clamping
pub const NOTATION_OCTAVES: RangeInclusive<i32> = 0..=8;

/// Scientific octave of ABC's uppercase row without suffix
const ABC_UPPER_OCTAVE: i32 = 4;

/// What to do with notes whose octave lies outside [`NOTATION_OCTAVES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OctavePolicy {
    /// Draw the note at the nearest octave inside the window
    #[default]
    Clamp,
    /// Fail with [`DrillError::NotationOutOfRange`]
    Reject,
}

/// Clef written into the ABC tune header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clef {
    Treble,
    #[default]
    Bass,
}

impl Clef {
    fn abc_name(self) -> &'static str {
        match self {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
        }
    }
}

impl FromStr for OctavePolicy {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(OctavePolicy::Clamp),
            "reject" => Ok(OctavePolicy::Reject),
            other => Err(DrillError::Config(format!(
                "Invalid octave policy '{}' (expected clamp or reject)",
                other
            ))),
        }
    }
}

impl FromStr for Clef {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "treble" => Ok(Clef::Treble),
            "bass" => Ok(Clef::Bass),
            other => Err(DrillError::Config(format!(
                "Invalid clef '{}' (expected treble or bass)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Renderer {
    pub clef: Clef,
    pub octave_policy: OctavePolicy,
}

impl Renderer {
    pub fn new(clef: Clef, octave_policy: OctavePolicy) -> Self {
        Self {
            clef,
            octave_policy,
        }
    }

    pub fn to_playback_frequency(&self, note: &Note) -> f64 {
        note.frequency()
    }

    /// The text shown once the note is revealed
    pub fn to_label(&self, note: &Note) -> String {
        note.pitch_class.name().to_string()
    }

    /// ABC token for a single note, e.g. `^F,,`
    pub fn to_notation_token(&self, note: &Note) -> Result<String> {
        let octave = self.notation_octave(note.octave)?;
        let scientific = octave + 1;

        let accidental = match note.pitch_class.accidental() {
            Accidental::Natural => "",
            Accidental::Sharp => "^",
            Accidental::Flat => "_",
        };
        let letter = note.pitch_class.letter().as_char();

        let token = if scientific <= ABC_UPPER_OCTAVE {
            let commas = (ABC_UPPER_OCTAVE - scientific) as usize;
            format!("{}{}{}", accidental, letter, ",".repeat(commas))
        } else {
            let apostrophes = (scientific - ABC_UPPER_OCTAVE - 1) as usize;
            format!(
                "{}{}{}",
                accidental,
                letter.to_ascii_lowercase(),
                "'".repeat(apostrophes)
            )
        };
        Ok(token)
    }

    /// A complete one-note ABC tune, ready for a staff renderer
    pub fn to_abc_tune(&self, note: &Note) -> Result<String> {
        let token = self.to_notation_token(note)?;
        let mut abc = String::new();
        abc.push_str("X:1\n");
        abc.push_str("L:1/8\n");
        abc.push_str(&format!("K:C {}\n", self.clef.abc_name()));
        abc.push_str("%%scale 6\n");
        abc.push_str("%%staffwidth 250\n");
        abc.push_str(&format!("{}2\n", token));
        Ok(abc)
    }

    fn notation_octave(&self, octave: i32) -> Result<i32> {
        if NOTATION_OCTAVES.contains(&octave) {
            return Ok(octave);
        }
        match self.octave_policy {
            OctavePolicy::Clamp => Ok(octave.clamp(
                *NOTATION_OCTAVES.start(),
                *NOTATION_OCTAVES.end(),
            )),
            OctavePolicy::Reject => Err(DrillError::NotationOutOfRange { octave }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::PitchClass;

    fn token(text: &str) -> String {
        Renderer::default()
            .to_notation_token(&text.parse().unwrap())
            .unwrap()
    }

    #[test]
    fn test_bass_string_tokens() {
        assert_eq!(token("E1"), "E,,");
        assert_eq!(token("A1"), "A,,");
        assert_eq!(token("C2"), "C,");
        assert_eq!(token("G2"), "G,");
        assert_eq!(token("F3"), "F");
    }

    #[test]
    fn test_upper_octaves_use_lowercase() {
        assert_eq!(token("C4"), "c");
        assert_eq!(token("B4"), "b");
        assert_eq!(token("C5"), "c'");
        assert_eq!(token("D7"), "d'''");
    }

    #[test]
    fn test_accidentals() {
        assert_eq!(token("F#1"), "^F,,");
        assert_eq!(token("Bb2"), "_B,");
        assert_eq!(token("Eb4"), "_e");
    }

    #[test]
    fn test_window_edges() {
        assert_eq!(token("C0"), "C,,,");
        assert_eq!(token("C8"), "c''''");
    }

    #[test]
    fn test_clamp_policy() {
        assert_eq!(token("C-1"), "C,,,");
        assert_eq!(token("C12"), "c''''");
    }

    #[test]
    fn test_reject_policy() {
        let renderer = Renderer::new(Clef::Bass, OctavePolicy::Reject);
        let low = Note::new(PitchClass::C, -1);
        assert!(matches!(
            renderer.to_notation_token(&low),
            Err(DrillError::NotationOutOfRange { octave: -1 })
        ));
        assert_eq!(renderer.to_notation_token(&Note::new(PitchClass::C, 0)).unwrap(), "C,,,");
    }

    #[test]
    fn test_clamp_never_changes_frequency() {
        let renderer = Renderer::default();
        let note = Note::new(PitchClass::A, 10);
        assert_eq!(renderer.to_playback_frequency(&note), 440.0 * 128.0);
    }

    #[test]
    fn test_abc_tune() {
        let renderer = Renderer::new(Clef::Bass, OctavePolicy::Clamp);
        let abc = renderer.to_abc_tune(&Note::new(PitchClass::E, 1)).unwrap();
        assert_eq!(
            abc,
            "X:1\nL:1/8\nK:C bass\n%%scale 6\n%%staffwidth 250\nE,,2\n"
        );

        let treble = Renderer::new(Clef::Treble, OctavePolicy::Clamp);
        assert!(treble.to_abc_tune(&Note::new(PitchClass::C, 3)).unwrap().contains("K:C treble"));
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("Treble".parse::<Clef>().unwrap(), Clef::Treble);
        assert_eq!("reject".parse::<OctavePolicy>().unwrap(), OctavePolicy::Reject);
        assert!(matches!("alto".parse::<Clef>(), Err(DrillError::Config(_))));
        assert!("wrap".parse::<OctavePolicy>().is_err());
    }

    #[test]
    fn test_label_is_spelling() {
        let renderer = Renderer::default();
        assert_eq!(renderer.to_label(&Note::new(PitchClass::DFlat, 2)), "Db");
    }
}
