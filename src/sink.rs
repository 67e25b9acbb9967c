//! # Sinks
//!
//! The two outputs a drill session drives:
//! - [`AudioSink`] - starts a tone at a frequency and stops it again
//! - [`DisplaySink`] - shows or hides the note label and renders staff notation
//!
//! The session never talks to a device directly, so any host (terminal, GUI, test
//! harness) can plug in its own implementations.
//!
//! ## Implementations
//! - [`LogAudioSink`] - silent, writes each tone to the log
//! - [`RodioAudioSink`] - plays a sine wave on the default output device
//!   (requires the `audio` feature)
//! - [`TerminalDisplay`] - writes labels and ABC tokens to any `io::Write`
//! - [`memory`] - records every call, for headless hosts and tests

use std::io::Write;

use ansi_term::Style;

use crate::error::{DrillError, Result};

/// Identifies one sounding tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToneHandle(pub u64);

pub trait AudioSink {
    /// Start a tone that keeps sounding until [`AudioSink::stop`]
    fn play(&mut self, frequency_hz: f64) -> Result<ToneHandle>;

    fn stop(&mut self, handle: ToneHandle) -> Result<()>;
}

pub trait DisplaySink {
    /// Show the label, or hide it with `None`
    fn show_label(&mut self, text: Option<&str>) -> Result<()>;

    /// Render a staff-notation token; hosts without a staff can ignore it
    fn render_staff(&mut self, _notation: &str) -> Result<()> {
        Ok(())
    }
}

impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    fn play(&mut self, frequency_hz: f64) -> Result<ToneHandle> {
        (**self).play(frequency_hz)
    }

    fn stop(&mut self, handle: ToneHandle) -> Result<()> {
        (**self).stop(handle)
    }
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn show_label(&mut self, text: Option<&str>) -> Result<()> {
        (**self).show_label(text)
    }

    fn render_staff(&mut self, notation: &str) -> Result<()> {
        (**self).render_staff(notation)
    }
}

/// Audio sink that only logs
#[derive(Debug, Default)]
pub struct LogAudioSink {
    next_handle: u64,
}

impl LogAudioSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for LogAudioSink {
    fn play(&mut self, frequency_hz: f64) -> Result<ToneHandle> {
        let handle = ToneHandle(self.next_handle);
        self.next_handle += 1;
        log::debug!("Tone {} on at {:.2} Hz", handle.0, frequency_hz);
        Ok(handle)
    }

    fn stop(&mut self, handle: ToneHandle) -> Result<()> {
        log::debug!("Tone {} off", handle.0);
        Ok(())
    }
}

/// Writes one line per update to a terminal or any other writer
pub struct TerminalDisplay<W: Write> {
    out: W,
    show_staff: bool,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, show_staff: bool) -> Self {
        Self { out, show_staff }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)
            .and_then(|_| self.out.flush())
            .map_err(|e| DrillError::Display(e.to_string()))
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn show_label(&mut self, text: Option<&str>) -> Result<()> {
        let line = match text {
            Some(label) => format!("  {}", Style::new().bold().paint(label)),
            None => "  ?".to_string(),
        };
        self.write_line(&line)
    }

    fn render_staff(&mut self, notation: &str) -> Result<()> {
        if !self.show_staff {
            return Ok(());
        }
        let indented: Vec<String> = notation.lines().map(|line| format!("    {}", line)).collect();
        self.write_line(&indented.join("\n"))
    }
}

#[cfg(feature = "audio")]
pub use self::rodio_sink::RodioAudioSink;

#[cfg(feature = "audio")]
mod rodio_sink {
    use std::collections::HashMap;

    use rodio::source::SineWave;
    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

    use super::{AudioSink, ToneHandle};
    use crate::error::{DrillError, Result};

    /// Output level of the sine tone
    const AMPLITUDE: f32 = 0.2;

    /// Sine tones on the default output device, one rodio `Sink` per tone
    pub struct RodioAudioSink {
        // Dropping the stream silences every sink
        _stream: OutputStream,
        handle: OutputStreamHandle,
        tones: HashMap<ToneHandle, Sink>,
        next_handle: u64,
    }

    impl RodioAudioSink {
        pub fn new() -> Result<Self> {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| DrillError::Audio(format!("Failed to open output device: {}", e)))?;
            Ok(Self {
                _stream: stream,
                handle,
                tones: HashMap::new(),
                next_handle: 0,
            })
        }
    }

    impl AudioSink for RodioAudioSink {
        fn play(&mut self, frequency_hz: f64) -> Result<ToneHandle> {
            let sink = Sink::try_new(&self.handle)
                .map_err(|e| DrillError::Audio(format!("Failed to create sink: {}", e)))?;
            sink.append(SineWave::new(frequency_hz as f32).amplify(AMPLITUDE));

            let handle = ToneHandle(self.next_handle);
            self.next_handle += 1;
            self.tones.insert(handle, sink);
            Ok(handle)
        }

        fn stop(&mut self, handle: ToneHandle) -> Result<()> {
            match self.tones.remove(&handle) {
                Some(sink) => {
                    sink.stop();
                    Ok(())
                }
                None => Err(DrillError::Audio(format!("Unknown tone {}", handle.0))),
            }
        }
    }
}

/// Sinks that record every call instead of producing output
pub mod memory {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{AudioSink, DisplaySink, ToneHandle};
    use crate::error::{DrillError, Result};

    /// Everything a [`MemoryAudioSink`] has been asked to do
    #[derive(Debug, Default)]
    pub struct AudioLog {
        /// Tones currently sounding, in start order
        pub active: Vec<(ToneHandle, f64)>,
        /// Every frequency ever started
        pub played: Vec<f64>,
        pub stopped: Vec<ToneHandle>,
        /// Most tones that were ever sounding at once
        pub max_concurrent: usize,
        /// When set, `play` fails instead of starting a tone
        pub fail_next_play: bool,
        /// When set, `stop` fails and the tone keeps sounding
        pub fail_next_stop: bool,
    }

    /// Shares its [`AudioLog`] so a test can inspect it while the session owns the sink
    #[derive(Debug, Clone, Default)]
    pub struct MemoryAudioSink {
        pub log: Rc<RefCell<AudioLog>>,
        next_handle: u64,
    }

    impl MemoryAudioSink {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl AudioSink for MemoryAudioSink {
        fn play(&mut self, frequency_hz: f64) -> Result<ToneHandle> {
            let mut log = self.log.borrow_mut();
            if log.fail_next_play {
                log.fail_next_play = false;
                return Err(DrillError::Audio("device unavailable".to_string()));
            }
            let handle = ToneHandle(self.next_handle);
            self.next_handle += 1;
            log.active.push((handle, frequency_hz));
            log.played.push(frequency_hz);
            let concurrent = log.active.len();
            log.max_concurrent = log.max_concurrent.max(concurrent);
            Ok(handle)
        }

        fn stop(&mut self, handle: ToneHandle) -> Result<()> {
            let mut log = self.log.borrow_mut();
            if log.fail_next_stop {
                log.fail_next_stop = false;
                return Err(DrillError::Audio(format!("Tone {} did not stop", handle.0)));
            }
            let before = log.active.len();
            log.active.retain(|(active, _)| *active != handle);
            if log.active.len() == before {
                return Err(DrillError::Audio(format!("Unknown tone {}", handle.0)));
            }
            log.stopped.push(handle);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub struct DisplayLog {
        /// Label as currently shown
        pub label: Option<String>,
        /// Every `show_label` call in order
        pub labels: Vec<Option<String>>,
        pub staves: Vec<String>,
        /// When set, the next `show_label` fails and the label stays as it was
        pub fail_next_label: bool,
        /// When set, the next `render_staff` fails and nothing is recorded
        pub fail_next_staff: bool,
    }

    #[derive(Debug, Clone, Default)]
    pub struct MemoryDisplay {
        pub log: Rc<RefCell<DisplayLog>>,
    }

    impl MemoryDisplay {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn label(&self) -> Option<String> {
            self.log.borrow().label.clone()
        }
    }

    impl DisplaySink for MemoryDisplay {
        fn show_label(&mut self, text: Option<&str>) -> Result<()> {
            let label = text.map(str::to_string);
            let mut log = self.log.borrow_mut();
            if log.fail_next_label {
                log.fail_next_label = false;
                return Err(DrillError::Display("label not shown".to_string()));
            }
            log.labels.push(label.clone());
            log.label = label;
            Ok(())
        }

        fn render_staff(&mut self, notation: &str) -> Result<()> {
            let mut log = self.log.borrow_mut();
            if log.fail_next_staff {
                log.fail_next_staff = false;
                return Err(DrillError::Display("staff not rendered".to_string()));
            }
            log.staves.push(notation.to_string());
            Ok(())
        }
    }
}
