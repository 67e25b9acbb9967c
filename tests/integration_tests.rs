//! Integration tests for notedrill
//!
//! Drives full sessions built from YAML configuration through recording sinks.

use std::time::Duration;

use notedrill::sink::memory::{MemoryAudioSink, MemoryDisplay};
use notedrill::{build_session, DrillConfig, DrillError, Phase};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn test_drill_from_yaml() {
    let yaml = r#"
advance-ms: 2000
reveal-ms: 1000
ranges: [E, A]
clef: bass
seed: 7
"#;
    let config = DrillConfig::from_yaml(yaml).unwrap();
    let audio = MemoryAudioSink::new();
    let display = MemoryDisplay::new();
    let mut session = build_session(&config, audio.clone(), display.clone()).unwrap();

    assert_eq!(session.inventory().len(), 10);
    assert_eq!(session.phase(), Phase::Stopped);
    assert!(display.label().is_some());

    assert_eq!(session.toggle(), Phase::Running);
    assert_eq!(display.label(), None);
    assert_eq!(audio.log.borrow().played.len(), 1);

    session.advance_to(ms(1000));
    assert_eq!(
        display.label().as_deref(),
        Some(session.current_note().pitch_class.name())
    );

    session.advance_to(ms(6000));
    assert_eq!(audio.log.borrow().played.len(), 4);
    assert_eq!(audio.log.borrow().max_concurrent, 1);

    assert_eq!(session.toggle(), Phase::Stopped);
    assert!(audio.log.borrow().active.is_empty());
    assert!(display.label().is_some());
    assert_eq!(session.next_deadline(), None);
    assert!(session.take_errors().is_empty());
}

#[test]
fn test_staff_uses_configured_clef() {
    let config = DrillConfig::from_yaml("clef: treble\nseed: 3\n").unwrap();
    let display = MemoryDisplay::new();
    let _session = build_session(&config, MemoryAudioSink::new(), display.clone()).unwrap();

    let staves = &display.log.borrow().staves;
    assert_eq!(staves.len(), 1);
    assert!(staves[0].starts_with("X:1\n"));
    assert!(staves[0].contains("K:C treble\n"));
    assert!(staves[0].contains("%%staffwidth 250\n"));
}

#[test]
fn test_same_seed_same_drill() {
    let config = DrillConfig::from_yaml("ranges: [E, A, D, G]\nseed: 99\n").unwrap();

    let run = || {
        let audio = MemoryAudioSink::new();
        let mut session = build_session(&config, audio.clone(), MemoryDisplay::new()).unwrap();
        session.toggle();
        session.advance_to(ms(20_000));
        let played = audio.log.borrow().played.clone();
        played
    };

    let first = run();
    assert_eq!(first.len(), 11);
    assert_eq!(first, run());
    assert!(first.windows(2).all(|pair| pair[0] != pair[1]));
}

#[test]
fn test_reject_policy_fails_at_startup() {
    let yaml = r#"
ranges:
  - name: extremes
    notes: [C3, C12]
octave-policy: reject
"#;
    let config = DrillConfig::from_yaml(yaml).unwrap();
    let result = build_session(&config, MemoryAudioSink::new(), MemoryDisplay::new());
    assert!(matches!(
        result.err(),
        Some(DrillError::NotationOutOfRange { octave: 12 })
    ));
}

#[test]
fn test_load_missing_file() {
    let result = DrillConfig::load("/nonexistent/notedrill.yaml");
    assert!(matches!(result, Err(DrillError::Io(_))));
}

#[test]
fn test_demo_configs_load() {
    let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");

    let bass = DrillConfig::load(demos.join("bass.yaml")).unwrap();
    assert_eq!(bass.inventory().unwrap().len(), 16);

    let treble = DrillConfig::load(demos.join("treble-accidentals.yaml")).unwrap();
    assert_eq!(treble.inventory().unwrap().len(), 3);
}
