//! Session state type definitions

use std::time::Duration;

use crate::error::{DrillError, Result};

/// Whether the drill is currently quizzing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    Running,
}

/// Snapshot of a session
///
/// # Fields
/// - `phase`: Stopped or Running
/// - `current_index`: Index of the current note in the inventory (always valid)
/// - `revealed`: Whether the current note's label is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    pub current_index: usize,
    pub revealed: bool,
}

/// How long each note plays and how long its label stays hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    pub advance_period: Duration,
    pub reveal_period: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            advance_period: Duration::from_millis(2000),
            reveal_period: Duration::from_millis(1000),
        }
    }
}

impl SessionTiming {
    pub fn from_millis(advance_ms: u64, reveal_ms: u64) -> Self {
        Self {
            advance_period: Duration::from_millis(advance_ms),
            reveal_period: Duration::from_millis(reveal_ms),
        }
    }

    /// Both periods must be positive and the label must appear before the note changes
    pub fn validate(&self) -> Result<()> {
        if self.advance_period.is_zero() {
            return Err(DrillError::Config("advance period must be greater than 0".to_string()));
        }
        if self.reveal_period.is_zero() {
            return Err(DrillError::Config("reveal period must be greater than 0".to_string()));
        }
        if self.reveal_period >= self.advance_period {
            return Err(DrillError::Config(format!(
                "reveal period ({} ms) must be shorter than advance period ({} ms)",
                self.reveal_period.as_millis(),
                self.advance_period.as_millis()
            )));
        }
        Ok(())
    }
}
