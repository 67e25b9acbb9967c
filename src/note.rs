//! # Note Model
//!
//! Pitch classes, octaves and the frequency table every other module builds on.
//!
//! ## Pitch Classes
//! There are 17 spellings for the 12 semitones of an octave: the seven naturals plus a
//! sharp and a flat spelling for each black key. Enharmonic spellings (`C#`/`Db`) sound
//! the same but are distinct values, so an inventory may hold both.
//!
//! ## Octave Numbering
//! Octaves are counted relative to [`REFERENCE_OCTAVE`] (3), the octave whose `C` is
//! middle C at 261.63 Hz and whose `A` is 440 Hz. This is one lower than scientific
//! pitch notation: the lowest string of a bass guitar is `E1` here (E2 scientific).
//!
//! ```text
//! frequency(pc, octave) = base_frequency(pc) * 2^(octave - 3)
//! ```
//!
//! ## Text Form
//! Notes are written as `<letter><accidental?><octave>`: `E1`, `C#2`, `Bb-1`.
//! `s` and `f` are accepted in place of `#` and `b` (`Fs2`, `Bf1`). Parsed octaves must
//! lie in [`PARSE_OCTAVES`].
//!
//! ## Related Modules
//! - `inventory` - Builds note sets out of these types
//! - `render` - Turns notes into frequencies, labels and ABC notation

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::DrillError;

/// The octave whose frequencies are stored in the base table.
pub const REFERENCE_OCTAVE: i32 = 3;

/// Octaves accepted when parsing a note from text
pub const PARSE_OCTAVES: RangeInclusive<i32> = -10..=20;

/// Note letters A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// Semitones above C of the natural note
    pub fn semitone(self) -> u8 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }

    /// The next letter up, and whether that step crosses into the next octave (B -> C)
    pub fn next(self) -> (NoteName, bool) {
        match self {
            NoteName::C => (NoteName::D, false),
            NoteName::D => (NoteName::E, false),
            NoteName::E => (NoteName::F, false),
            NoteName::F => (NoteName::G, false),
            NoteName::G => (NoteName::A, false),
            NoteName::A => (NoteName::B, false),
            NoteName::B => (NoteName::C, true),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }
}

/// Accidentals a pitch class can be spelled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// One of the 17 spellings of the 12 semitones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    DFlat,
    D,
    DSharp,
    EFlat,
    E,
    F,
    FSharp,
    GFlat,
    G,
    GSharp,
    AFlat,
    A,
    ASharp,
    BFlat,
    B,
}

impl PitchClass {
    /// Every spelling in chromatic order, sharps before flats
    pub const ALL: [PitchClass; 17] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::DFlat,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::EFlat,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::GFlat,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::AFlat,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::BFlat,
        PitchClass::B,
    ];

    /// Frequency in Hz at [`REFERENCE_OCTAVE`]
    pub fn base_frequency(self) -> f64 {
        match self {
            PitchClass::C => 261.63,
            PitchClass::CSharp | PitchClass::DFlat => 277.18,
            PitchClass::D => 293.66,
            PitchClass::DSharp | PitchClass::EFlat => 311.13,
            PitchClass::E => 329.63,
            PitchClass::F => 349.23,
            PitchClass::FSharp | PitchClass::GFlat => 369.99,
            PitchClass::G => 392.0,
            PitchClass::GSharp | PitchClass::AFlat => 415.3,
            PitchClass::A => 440.0,
            PitchClass::ASharp | PitchClass::BFlat => 466.16,
            PitchClass::B => 493.88,
        }
    }

    pub fn letter(self) -> NoteName {
        match self {
            PitchClass::C | PitchClass::CSharp => NoteName::C,
            PitchClass::DFlat | PitchClass::D | PitchClass::DSharp => NoteName::D,
            PitchClass::EFlat | PitchClass::E => NoteName::E,
            PitchClass::F | PitchClass::FSharp => NoteName::F,
            PitchClass::GFlat | PitchClass::G | PitchClass::GSharp => NoteName::G,
            PitchClass::AFlat | PitchClass::A | PitchClass::ASharp => NoteName::A,
            PitchClass::BFlat | PitchClass::B => NoteName::B,
        }
    }

    pub fn accidental(self) -> Accidental {
        match self {
            PitchClass::CSharp
            | PitchClass::DSharp
            | PitchClass::FSharp
            | PitchClass::GSharp
            | PitchClass::ASharp => Accidental::Sharp,
            PitchClass::DFlat
            | PitchClass::EFlat
            | PitchClass::GFlat
            | PitchClass::AFlat
            | PitchClass::BFlat => Accidental::Flat,
            _ => Accidental::Natural,
        }
    }

    /// Semitones above C (0..=11)
    pub fn semitone(self) -> u8 {
        let base = self.letter().semitone();
        match self.accidental() {
            Accidental::Natural => base,
            Accidental::Sharp => base + 1,
            Accidental::Flat => base - 1,
        }
    }

    /// The natural pitch class for a letter
    pub fn natural(letter: NoteName) -> Self {
        match letter {
            NoteName::C => PitchClass::C,
            NoteName::D => PitchClass::D,
            NoteName::E => PitchClass::E,
            NoteName::F => PitchClass::F,
            NoteName::G => PitchClass::G,
            NoteName::A => PitchClass::A,
            NoteName::B => PitchClass::B,
        }
    }

    /// Spelling as shown to the learner, e.g. `C#` or `Bb`
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::DFlat => "Db",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::EFlat => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::GFlat => "Gb",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::AFlat => "Ab",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::BFlat => "Bb",
            PitchClass::B => "B",
        }
    }

    fn from_parts(letter: NoteName, accidental: Accidental) -> Option<Self> {
        PitchClass::ALL
            .into_iter()
            .find(|pc| pc.letter() == letter && pc.accidental() == accidental)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = DrillError;

    /// Parse a spelling like `E`, `F#`, `Fs`, `Bb` or `Bf`.
    /// `Cb`, `E#` and friends have no entry in the table and are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || DrillError::UnknownPitchClass(s.to_string());
        let mut chars = s.trim().chars();
        let letter = chars.next().and_then(NoteName::from_char).ok_or_else(unknown)?;
        let accidental = match chars.next() {
            None => Accidental::Natural,
            Some('#') | Some('s') => Accidental::Sharp,
            Some('b') | Some('f') => Accidental::Flat,
            Some(_) => return Err(unknown()),
        };
        if chars.next().is_some() {
            return Err(unknown());
        }
        PitchClass::from_parts(letter, accidental).ok_or_else(unknown)
    }
}

/// A pitch class in a specific octave
///
/// Equality is by spelling: `C#3` and `Db3` are different notes that happen to share
/// a frequency. Use [`Note::same_pitch`] to compare by sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub pitch_class: PitchClass,
    pub octave: i32,
}

impl Note {
    pub const fn new(pitch_class: PitchClass, octave: i32) -> Self {
        Self {
            pitch_class,
            octave,
        }
    }

    /// Frequency in Hz, scaled from the reference octave by an exact power of two
    pub fn frequency(&self) -> f64 {
        let exponent = self.octave.saturating_sub(REFERENCE_OCTAVE);
        self.pitch_class.base_frequency() * 2f64.powi(exponent)
    }

    /// Whether both notes sound the same, regardless of spelling
    pub fn same_pitch(&self, other: &Note) -> bool {
        self.octave == other.octave && self.pitch_class.semitone() == other.pitch_class.semitone()
    }

    /// The natural note one letter up, wrapping B into the next octave's C
    pub fn next_natural(&self) -> Note {
        let (letter, wraps) = self.pitch_class.letter().next();
        let octave = if wraps { self.octave + 1 } else { self.octave };
        Note::new(PitchClass::natural(letter), octave)
    }
}

/// Frequency of a note in Hz
pub fn frequency_of(note: &Note) -> f64 {
    note.frequency()
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

impl FromStr for Note {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_digit() || *c == '-')
            .map(|(i, _)| i)
            .ok_or_else(|| DrillError::InvalidNote(s.to_string()))?;

        let (pitch, octave) = trimmed.split_at(split);
        let pitch_class: PitchClass = pitch.parse()?;
        let octave: i32 = octave
            .parse()
            .map_err(|_| DrillError::InvalidNote(s.to_string()))?;
        if !PARSE_OCTAVES.contains(&octave) {
            return Err(DrillError::InvalidNote(s.to_string()));
        }
        Ok(Note::new(pitch_class, octave))
    }
}
