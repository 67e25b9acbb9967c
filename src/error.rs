//! # Error Types
//!
//! This module defines all error types for the drill engine.
//!
//! Errors fall into two groups:
//! - **Configuration errors** - empty or singleton inventories, unparseable notes,
//!   invalid YAML settings. These are fatal and abort session construction.
//! - **Sink errors** - the audio device or the display failed. The session keeps
//!   its own state consistent and hands these back to the host, which decides
//!   whether to mute, retry later, or show a diagnostic.
//!
//! ## Usage
//! ```rust
//! use notedrill::{DrillConfig, DrillError};
//!
//! match DrillConfig::from_yaml("ranges: [X]") {
//!     Ok(_) => println!("Loaded"),
//!     Err(DrillError::Config(message)) => eprintln!("Bad config: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DrillError>;

#[derive(Error, Debug)]
pub enum DrillError {
    /// No notes were available to drill.
    ///
    /// # Example
    /// ```
    /// # use notedrill::DrillError;
    /// assert_eq!(DrillError::EmptyInventory.to_string(), "Inventory is empty");
    /// ```
    #[error("Inventory is empty")]
    EmptyInventory,

    /// A distinct next note was requested from an inventory that cannot provide one.
    ///
    /// # Example
    /// ```
    /// # use notedrill::DrillError;
    /// let err = DrillError::SingletonInventory { size: 1 };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Inventory of 1 note(s) cannot provide a different next note"
    /// );
    /// ```
    #[error("Inventory of {size} note(s) cannot provide a different next note")]
    SingletonInventory { size: usize },

    #[error("Index {index} is out of range for an inventory of {size} note(s)")]
    IndexOutOfRange { index: usize, size: usize },

    /// Text that does not name one of the known pitch classes.
    #[error("Unknown pitch class: {0}")]
    UnknownPitchClass(String),

    /// Text that is not a `<pitch class><octave>` pair, e.g. `E` or `C#x`.
    #[error("Invalid note: {0}")]
    InvalidNote(String),

    /// The note lies outside the staff window and the octave policy rejects it.
    #[error("Octave {octave} is outside the notation window")]
    NotationOutOfRange { octave: i32 },

    /// Invalid drill configuration.
    ///
    /// # Example
    /// ```
    /// # use notedrill::DrillError;
    /// let err = DrillError::Config("reveal-ms must be shorter than advance-ms".to_string());
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid configuration: reveal-ms must be shorter than advance-ms"
    /// );
    /// ```
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The audio sink could not start or stop a tone.
    #[error("Audio sink error: {0}")]
    Audio(String),

    /// The display sink could not show a label or render the staff.
    #[error("Display sink error: {0}")]
    Display(String),
}

impl DrillError {
    /// Whether this error came from a sink rather than from configuration.
    pub fn is_sink_error(&self) -> bool {
        matches!(self, DrillError::Audio(_) | DrillError::Display(_))
    }
}
