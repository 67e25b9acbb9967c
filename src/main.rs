use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::Instant;

use clap::{ArgAction, Parser};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::LevelFilter;

use notedrill::inventory::{preset, preset_names};
use notedrill::render::Clef;
use notedrill::sink::{LogAudioSink, TerminalDisplay};
use notedrill::{build_session, logging, AudioSink, DrillConfig, Phase};

#[derive(Parser)]
#[command(name = "notedrill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML drill configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bass string presets to drill, e.g. `E,A`
    #[arg(short, long, value_delimiter = ',')]
    strings: Vec<String>,

    /// Milliseconds between notes
    #[arg(long)]
    advance_ms: Option<u64>,

    /// Milliseconds before a note's name is shown
    #[arg(long)]
    reveal_ms: Option<u64>,

    /// Fix the note sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Clef for the staff notation (treble or bass)
    #[arg(long)]
    clef: Option<Clef>,

    /// Print the ABC staff for every new note
    #[arg(long)]
    staff: bool,

    /// Do not open the audio device
    #[arg(long)]
    mute: bool,

    /// List the built-in string presets and exit
    #[arg(long)]
    list_presets: bool,

    /// More log output (repeat for trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

enum Input {
    Toggle,
    Quit,
}

fn main() {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    logging::init(level);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> notedrill::Result<()> {
    if cli.list_presets {
        for name in preset_names() {
            let range = preset(name)?;
            let notes: Vec<String> = range.notes.iter().map(|note| note.to_string()).collect();
            println!("{}: {}", name, notes.join(" "));
        }
        return Ok(());
    }

    let config = load_config(&cli)?;
    let display = TerminalDisplay::new(io::stdout(), cli.staff);
    let mut session = build_session(&config, open_audio(cli.mute), display)?;

    println!("Press Enter to start or stop, q then Enter to quit.");
    let input = spawn_input()?;
    let started = Instant::now();
    let mut sink_failures = 0usize;

    loop {
        let event = match session.next_deadline() {
            Some(deadline) => input.recv_timeout(deadline.saturating_sub(started.elapsed())),
            None => input.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match event {
            Ok(Input::Toggle) => {
                session.advance_to(started.elapsed());
                match session.toggle() {
                    Phase::Running => log::debug!("Drill running"),
                    Phase::Stopped => log::debug!("Drill stopped"),
                }
            }
            Err(RecvTimeoutError::Timeout) => session.advance_to(started.elapsed()),
            Ok(Input::Quit) | Err(RecvTimeoutError::Disconnected) => break,
        }

        sink_failures += session
            .take_errors()
            .iter()
            .filter(|error| error.is_sink_error())
            .count();
    }

    session.shutdown();
    if sink_failures > 0 {
        log::warn!("{} sink failure(s) during the drill", sink_failures);
    }
    Ok(())
}

/// File settings first, then command-line overrides
fn load_config(cli: &Cli) -> notedrill::Result<DrillConfig> {
    let mut config = match &cli.config {
        Some(path) => DrillConfig::load(path)?,
        None => DrillConfig::default(),
    };

    if !cli.strings.is_empty() {
        config = config.with_presets(&cli.strings)?;
    }
    if let Some(advance_ms) = cli.advance_ms {
        config.timing.advance_period = std::time::Duration::from_millis(advance_ms);
    }
    if let Some(reveal_ms) = cli.reveal_ms {
        config.timing.reveal_period = std::time::Duration::from_millis(reveal_ms);
    }
    if let Some(clef) = cli.clef {
        config.clef = clef;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(feature = "audio")]
fn open_audio(mute: bool) -> Box<dyn AudioSink> {
    if mute {
        return Box::new(LogAudioSink::new());
    }
    match notedrill::sink::RodioAudioSink::new() {
        Ok(sink) => Box::new(sink),
        Err(e) => {
            log::warn!("{}; continuing without sound", e);
            Box::new(LogAudioSink::new())
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_audio(mute: bool) -> Box<dyn AudioSink> {
    if !mute {
        log::warn!("Built without the `audio` feature; tones are only logged");
    }
    Box::new(LogAudioSink::new())
}

/// Forward stdin lines as toggle/quit events
fn spawn_input() -> io::Result<Receiver<Input>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let event = match line {
                    Ok(text) if text.trim().eq_ignore_ascii_case("q") => Input::Quit,
                    Ok(_) => Input::Toggle,
                    Err(_) => Input::Quit,
                };
                let quit = matches!(event, Input::Quit);
                if tx.send(event).is_err() || quit {
                    return;
                }
            }
            // End of input
            let _ = tx.send(Input::Quit);
        })?;
    Ok(rx)
}
