pub mod clock;
pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod note;
pub mod render;
pub mod selector;
pub mod session;
pub mod sink;

pub use config::DrillConfig;
pub use error::*;
pub use inventory::{merge, Inventory};
pub use note::{frequency_of, Note, PitchClass};
pub use render::Renderer;
pub use selector::Selector;
pub use session::{Phase, Session};
pub use sink::{AudioSink, DisplaySink};

/// Build a stopped session from a drill configuration.
/// This is the main entry point for hosts.
pub fn build_session<A: AudioSink, D: DisplaySink>(
    config: &DrillConfig,
    audio: A,
    display: D,
) -> Result<Session<A, D>> {
    Session::new(
        config.inventory()?,
        config.selector(),
        config.renderer(),
        config.timing,
        audio,
        display,
    )
}
