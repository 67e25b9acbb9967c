//! Terminal logger for the `log` facade

use ansi_term::Color::{Blue, Cyan, Green, Red, Yellow};
use log::{Level, LevelFilter, Log, Metadata, Record};

pub struct DrillLogger {
    level: LevelFilter,
}

impl Log for DrillLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            fn colored_level(level: Level) -> ansi_term::Colour {
                match level {
                    Level::Error => Red,
                    Level::Warn => Yellow,
                    Level::Info => Green,
                    Level::Debug => Blue,
                    Level::Trace => Cyan,
                }
            }

            // stdout belongs to the drill display
            eprintln!(
                "[{:>5}] {} [{}]",
                colored_level(record.level()).paint(record.level().to_string()),
                record.args(),
                Green.paint(record.target())
            );
        }
    }

    fn flush(&self) {}
}

/// Install the logger; a second call keeps the first logger
pub fn init(level: LevelFilter) {
    let logger = Box::new(DrillLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}
