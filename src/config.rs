//! # Drill Configuration
//!
//! Everything that used to differ between drill variants (note ranges, timing, staff
//! settings) is plain configuration, read from YAML:
//!
//! ```yaml
//! advance-ms: 3000        # a new note every 3 s
//! reveal-ms: 1500         # label appears 1.5 s into each note
//! ranges:                 # merged in order, first occurrence wins
//!   - E                   # built-in bass string preset
//!   - name: high notes    # or an explicit list
//!     notes: [C3, D3, Eb3]
//! dedup: spelling         # spelling | pitch
//! clef: bass              # bass | treble
//! octave-policy: clamp    # clamp | reject
//! seed: 42                # optional, fixes the note sequence
//! ```
//!
//! Every key is optional. The YAML is first read into [`RawDrillConfig`] and then
//! validated into a [`DrillConfig`]; every problem is reported as
//! [`DrillError::Config`].

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DrillError, Result};
use crate::inventory::{default_range, preset, Dedup, Inventory, NoteRange};
use crate::note::Note;
use crate::render::{Clef, OctavePolicy, Renderer};
use crate::selector::Selector;
use crate::session::SessionTiming;

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawDrillConfig {
    pub advance_ms: Option<u64>,
    pub reveal_ms: Option<u64>,
    pub ranges: Option<Vec<RawRange>>,
    pub dedup: Option<String>,
    pub clef: Option<String>,
    pub octave_policy: Option<String>,
    pub seed: Option<u64>,
}

/// A range entry: a preset name or an explicit note list
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum RawRange {
    Preset(String),
    Notes { name: String, notes: Vec<String> },
}

/// Validated drill settings
#[derive(Debug, Clone, PartialEq)]
pub struct DrillConfig {
    pub timing: SessionTiming,
    pub ranges: Vec<NoteRange>,
    pub dedup: Dedup,
    pub clef: Clef,
    pub octave_policy: OctavePolicy,
    pub seed: Option<u64>,
}

impl Default for DrillConfig {
    /// Open E string, a new note every 2 s, revealed after 1 s
    fn default() -> Self {
        Self {
            timing: SessionTiming::default(),
            ranges: vec![default_range()],
            dedup: Dedup::default(),
            clef: Clef::default(),
            octave_policy: OctavePolicy::default(),
            seed: None,
        }
    }
}

impl DrillConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Self::from_raw(RawDrillConfig::default());
        }
        let raw: RawDrillConfig =
            serde_yaml::from_str(content).map_err(|e| DrillError::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Self::from_yaml(&content)
    }

    pub fn from_raw(raw: RawDrillConfig) -> Result<Self> {
        let defaults = Self::default();

        let timing = SessionTiming::from_millis(
            raw.advance_ms
                .unwrap_or(defaults.timing.advance_period.as_millis() as u64),
            raw.reveal_ms
                .unwrap_or(defaults.timing.reveal_period.as_millis() as u64),
        );

        let ranges = match raw.ranges {
            Some(entries) => entries
                .into_iter()
                .map(parse_range)
                .collect::<Result<Vec<_>>>()?,
            None => defaults.ranges,
        };

        let config = Self {
            timing,
            ranges,
            dedup: parse_or(raw.dedup, defaults.dedup)?,
            clef: parse_or(raw.clef, defaults.clef)?,
            octave_policy: parse_or(raw.octave_policy, defaults.octave_policy)?,
            seed: raw.seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the ranges with built-in presets, e.g. `["E", "A"]`
    pub fn with_presets<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        self.ranges = names
            .iter()
            .map(|name| preset(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// Timing must be valid and the merged inventory must hold at least two notes
    pub fn validate(&self) -> Result<()> {
        self.timing.validate()?;
        if self.ranges.is_empty() {
            return Err(DrillError::Config("at least one range is required".to_string()));
        }
        let inventory = self.inventory()?;
        if inventory.len() < 2 {
            return Err(DrillError::Config(format!(
                "ranges produce {} distinct note(s); a drill needs at least 2",
                inventory.len()
            )));
        }
        Ok(())
    }

    pub fn inventory(&self) -> Result<Inventory> {
        Inventory::from_ranges(&self.ranges, self.dedup)
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.clef, self.octave_policy)
    }

    /// Seeded when `seed` is set, otherwise seeded from the OS
    pub fn selector(&self) -> Selector {
        match self.seed {
            Some(seed) => Selector::seeded(seed),
            None => Selector::from_entropy(),
        }
    }
}

fn parse_range(raw: RawRange) -> Result<NoteRange> {
    match raw {
        RawRange::Preset(name) => preset(&name),
        RawRange::Notes { name, notes } => {
            let notes = notes
                .iter()
                .map(|text| {
                    text.parse::<Note>().map_err(|e| {
                        DrillError::Config(format!("range '{}', note '{}': {}", name, text, e))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(NoteRange::new(name, notes))
        }
    }
}

fn parse_or<T: std::str::FromStr<Err = DrillError>>(
    value: Option<String>,
    default: T,
) -> Result<T> {
    match value {
        Some(text) => text.parse(),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::PitchClass;
    use std::time::Duration;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DrillConfig::from_yaml("").unwrap();
        assert_eq!(config, DrillConfig::default());
        assert_eq!(config.timing.advance_period, Duration::from_millis(2000));
        assert_eq!(config.timing.reveal_period, Duration::from_millis(1000));
        assert_eq!(config.clef, Clef::Bass);
        assert_eq!(config.inventory().unwrap().len(), 7);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
advance-ms: 3000
reveal-ms: 1500
ranges:
  - E
  - name: high notes
    notes: [C3, D3, Eb3]
dedup: pitch
clef: treble
octave-policy: reject
seed: 42
"#;
        let config = DrillConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.timing, SessionTiming::from_millis(3000, 1500));
        assert_eq!(config.ranges.len(), 2);
        assert_eq!(config.ranges[1].name, "high notes");
        assert_eq!(config.ranges[1].notes[2], Note::new(PitchClass::EFlat, 3));
        assert_eq!(config.dedup, Dedup::Pitch);
        assert_eq!(config.clef, Clef::Treble);
        assert_eq!(config.octave_policy, OctavePolicy::Reject);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.inventory().unwrap().len(), 10);
    }

    #[test]
    fn test_reveal_must_be_shorter_than_advance() {
        let result = DrillConfig::from_yaml("advance-ms: 1000\nreveal-ms: 1000\n");
        assert!(matches!(result, Err(DrillError::Config(_))));
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(DrillConfig::from_yaml("advance-ms: 0").is_err());
    }

    #[test]
    fn test_unknown_preset() {
        match DrillConfig::from_yaml("ranges: [X]") {
            Err(DrillError::Config(message)) => {
                assert!(message.contains("Unknown range preset 'X'"))
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_note_names_its_range() {
        match DrillConfig::from_yaml("ranges:\n  - name: mine\n    notes: [C3, H3]\n") {
            Err(DrillError::Config(message)) => {
                assert!(message.contains("mine"));
                assert!(message.contains("H3"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_extreme_octave_rejected() {
        let yaml = "ranges:\n  - name: deep\n    notes: [C-2147483648, D-2147483648]\n";
        match DrillConfig::from_yaml(yaml) {
            Err(DrillError::Config(message)) => {
                assert!(message.contains("deep"));
                assert!(message.contains("C-2147483648"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_single_note_inventory_rejected() {
        let yaml = "ranges:\n  - name: one\n    notes: [E1, E1]\n";
        match DrillConfig::from_yaml(yaml) {
            Err(DrillError::Config(message)) => assert!(message.contains("at least 2")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_ranges_rejected() {
        assert!(matches!(
            DrillConfig::from_yaml("ranges: []"),
            Err(DrillError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            DrillConfig::from_yaml("tempo: 120"),
            Err(DrillError::Config(_))
        ));
    }

    #[test]
    fn test_bad_enum_values() {
        assert!(DrillConfig::from_yaml("clef: alto").is_err());
        assert!(DrillConfig::from_yaml("dedup: letters").is_err());
        assert!(DrillConfig::from_yaml("octave-policy: wrap").is_err());
    }

    #[test]
    fn test_with_presets() {
        let config = DrillConfig::default().with_presets(&["E", "A", "D", "G"]).unwrap();
        assert_eq!(config.inventory().unwrap().len(), 16);
        assert!(DrillConfig::default().with_presets(&["Q"]).is_err());
    }

    #[test]
    fn test_seeded_selector_is_reproducible() {
        let config = DrillConfig::from_yaml("seed: 5").unwrap();
        let a = config.selector().initial(100).unwrap();
        let b = config.selector().initial(100).unwrap();
        assert_eq!(a, b);
    }
}
