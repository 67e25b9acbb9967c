//! Drill session engine
//!
//! Owns the inventory, the selector, the timer queue and both sinks. All state changes
//! go through `&mut self` ([`Session::toggle`] and [`Session::advance_to`]), so timer
//! firings and toggles never interleave. Session state is always updated before the
//! sinks are called; a sink failure is logged and queued but never rolls state back.

use std::time::Duration;

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Phase, SessionState, SessionTiming};
use crate::clock::{Scheduler, Timer, TimerId, TimerQueue};
use crate::error::{DrillError, Result};
use crate::inventory::Inventory;
use crate::note::Note;
use crate::render::Renderer;
use crate::selector::Selector;
use crate::sink::{AudioSink, DisplaySink, ToneHandle};

pub struct Session<A, D, R = Pcg32> {
    inventory: Inventory,
    selector: Selector<R>,
    renderer: Renderer,
    timing: SessionTiming,
    timers: TimerQueue,
    audio: A,
    display: D,
    state: SessionState,
    advance_timer: Option<TimerId>,
    reveal_timer: Option<TimerId>,
    // The only tone allowed to sound
    tone: Option<ToneHandle>,
    errors: Vec<DrillError>,
}

impl<A: AudioSink, D: DisplaySink, R: Rng> Session<A, D, R> {
    /// Create a stopped session on a random note, with its label shown
    ///
    /// Fails on configuration errors: invalid timing, fewer than two notes, or notes the
    /// renderer refuses to notate.
    pub fn new(
        inventory: Inventory,
        mut selector: Selector<R>,
        renderer: Renderer,
        timing: SessionTiming,
        audio: A,
        display: D,
    ) -> Result<Self> {
        timing.validate()?;
        if inventory.len() < 2 {
            return Err(DrillError::SingletonInventory {
                size: inventory.len(),
            });
        }
        for note in inventory.iter() {
            renderer.to_notation_token(note)?;
        }

        let current_index = selector.initial(inventory.len())?;
        let mut session = Self {
            inventory,
            selector,
            renderer,
            timing,
            timers: TimerQueue::new(),
            audio,
            display,
            state: SessionState {
                phase: Phase::Stopped,
                current_index,
                revealed: true,
            },
            advance_timer: None,
            reveal_timer: None,
            tone: None,
            errors: Vec::new(),
        };

        log::info!(
            "Session ready: {} notes, first note {}",
            session.inventory.len(),
            session.current_note()
        );
        session.render_staff();
        session.show_label();
        Ok(session)
    }

    /// Flip between Stopped and Running, returning the new phase
    pub fn toggle(&mut self) -> Phase {
        match self.state.phase {
            Phase::Stopped => self.start(),
            Phase::Running => self.stop(),
        }
        self.state.phase
    }

    /// Fire every timer due at or before `now`, then move the clock to `now`
    pub fn advance_to(&mut self, now: Duration) {
        while let Some(fired) = self.timers.pop_due(now) {
            log::debug!("{:?} timer fired at {} ms", fired.timer, fired.deadline.as_millis());
            match fired.timer {
                Timer::Advance => self.on_advance(fired.id),
                Timer::Reveal => self.on_reveal(fired.id),
            }
        }
        self.timers.advance_to(now);
    }

    /// Shorthand for `advance_to(now() + delta)`
    pub fn elapse(&mut self, delta: Duration) {
        self.advance_to(self.now() + delta);
    }

    /// Stop if running and silence any tone
    pub fn shutdown(&mut self) {
        if self.is_running() {
            self.stop();
        }
        self.stop_tone();
    }

    /// Sink and selector errors raised since the last call, oldest first
    pub fn take_errors(&mut self) -> Vec<DrillError> {
        std::mem::take(&mut self.errors)
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == Phase::Running
    }

    pub fn is_revealed(&self) -> bool {
        self.state.revealed
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_note(&self) -> Note {
        self.inventory.notes()[self.state.current_index]
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn timing(&self) -> SessionTiming {
        self.timing
    }

    fn start(&mut self) {
        self.state.phase = Phase::Running;
        self.state.revealed = false;
        self.advance_timer = Some(self.timers.schedule(self.timing.advance_period, Timer::Advance));
        self.restart_reveal_timer();
        log::info!("Running on {}", self.current_note());

        self.hide_label();
        self.start_tone();
    }

    fn stop(&mut self) {
        self.state.phase = Phase::Stopped;
        self.cancel_timer(Timer::Advance);
        self.cancel_timer(Timer::Reveal);
        self.state.revealed = true;
        log::info!("Stopped on {}", self.current_note());

        self.stop_tone();
        self.show_label();
    }

    fn on_advance(&mut self, id: TimerId) {
        if self.advance_timer != Some(id) || !self.is_running() {
            return;
        }

        let next = match self
            .selector
            .next(self.state.current_index, self.inventory.len())
        {
            Ok(next) => next,
            Err(e) => {
                log::error!("Cannot select next note: {}", e);
                self.errors.push(e);
                self.stop();
                return;
            }
        };

        self.state.current_index = next;
        self.state.revealed = false;
        // The clock sits at this tick's deadline, so the interval does not drift
        self.advance_timer = Some(self.timers.schedule(self.timing.advance_period, Timer::Advance));
        self.restart_reveal_timer();
        log::debug!("Advanced to {} (index {})", self.current_note(), next);

        self.hide_label();
        self.render_staff();
        self.start_tone();
    }

    fn on_reveal(&mut self, id: TimerId) {
        if self.reveal_timer != Some(id) || !self.is_running() {
            return;
        }
        self.reveal_timer = None;
        self.state.revealed = true;
        self.show_label();
    }

    fn restart_reveal_timer(&mut self) {
        self.cancel_timer(Timer::Reveal);
        self.reveal_timer = Some(self.timers.schedule(self.timing.reveal_period, Timer::Reveal));
    }

    fn cancel_timer(&mut self, timer: Timer) {
        let slot = match timer {
            Timer::Advance => self.advance_timer.take(),
            Timer::Reveal => self.reveal_timer.take(),
        };
        if let Some(id) = slot {
            self.timers.cancel(id);
        }
    }

    fn start_tone(&mut self) {
        self.stop_tone();
        let frequency = self.renderer.to_playback_frequency(&self.current_note());
        match self.audio.play(frequency) {
            Ok(handle) => self.tone = Some(handle),
            Err(e) => self.report(e),
        }
    }

    fn stop_tone(&mut self) {
        if let Some(handle) = self.tone.take() {
            if let Err(e) = self.audio.stop(handle) {
                self.report(e);
            }
        }
    }

    fn show_label(&mut self) {
        let label = self.renderer.to_label(&self.current_note());
        if let Err(e) = self.display.show_label(Some(&label)) {
            self.report(e);
        }
    }

    fn hide_label(&mut self) {
        if let Err(e) = self.display.show_label(None) {
            self.report(e);
        }
    }

    fn render_staff(&mut self) {
        let result = self
            .renderer
            .to_abc_tune(&self.current_note())
            .and_then(|abc| self.display.render_staff(&abc));
        if let Err(e) = result {
            self.report(e);
        }
    }

    fn report(&mut self, error: DrillError) {
        log::warn!("{}", error);
        self.errors.push(error);
    }
}
