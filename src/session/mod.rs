//! # Session Module
//!
//! The drill state machine: which note is current, whether its label is visible, and
//! when the next note comes.
//!
//! ## Sub-modules
//! - `state` - Phase, SessionState and SessionTiming definitions
//! - `engine` - The [`Session`] itself: toggle, timers, sink updates
//!
//! ## Phases
//! ```text
//!            toggle                        toggle
//!  Stopped ----------> Running  ...  Running ----------> Stopped
//!  (label shown)       label hidden,           advance + reveal timers
//!                      tone on, timers         cancelled, label shown,
//!                      started                 tone off
//! ```
//!
//! ## Timers
//! Two timers drive a running session:
//!
//! ### Advance
//! - Fires every `advance_period`
//! - Selects a different note, hides the label, restarts the reveal timer
//!
//! ### Reveal
//! - Fires `reveal_period` after a note was selected (or the run started)
//! - Shows the label, giving the learner a window to guess by ear first
//! - Cancelled whenever the note changes or the session stops, so it never reveals a
//!   note that is no longer current
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use notedrill::inventory::Inventory;
//! use notedrill::render::Renderer;
//! use notedrill::selector::Selector;
//! use notedrill::session::{Phase, Session, SessionTiming};
//! use notedrill::sink::memory::{MemoryAudioSink, MemoryDisplay};
//!
//! let inventory = Inventory::new(vec!["C3".parse().unwrap(), "D3".parse().unwrap()]).unwrap();
//! let display = MemoryDisplay::new();
//! let mut session = Session::new(
//!     inventory,
//!     Selector::seeded(1),
//!     Renderer::default(),
//!     SessionTiming::default(),
//!     MemoryAudioSink::new(),
//!     display.clone(),
//! )
//! .unwrap();
//!
//! assert_eq!(session.toggle(), Phase::Running);
//! assert_eq!(display.label(), None);
//!
//! session.advance_to(Duration::from_millis(1000));
//! assert!(session.is_revealed());
//! ```
//!
//! ## Related Modules
//! - `clock` - The timer queue the session schedules on
//! - `selector` - Picks each next note
//! - `render` - Produces frequencies, labels and ABC tunes for the sinks

mod engine;
mod state;


pub use engine::Session;
pub use state::{Phase, SessionState, SessionTiming};
