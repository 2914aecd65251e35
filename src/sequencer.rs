//! The sequencer: owned state plus the tick functions that drive it.
//!
//! Everything runs from one loop. [`Sequencer::poll`] is the sub-tick (read
//! keys, classify, dispatch) and [`Sequencer::step`] the step boundary (play,
//! then redraw). Hosts without a scheduler of their own can call
//! [`Sequencer::run_until`] with a monotonic clock instead.

use core::fmt::Debug;

use smart_leds::{SmartLedsWrite, RGB8};

use crate::config::Config;
use crate::error::{Error, Result, Transport};
use crate::inputs::ButtonMatrix;
use crate::keyboard::{Instant, KeyEvent, Keyboard};
use crate::led::{self, LedDriver};
use crate::mode::{Mutation, Ui, UiMode};
use crate::outputs::MidiOut;
use crate::pattern::{NoteCell, Pattern, Step};
use crate::player::{self, StepCursor, Voices};

/// What handling one key event did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    CellChanged { step: Step, cell: NoteCell },
    ModeChanged,
    Reset,
}

/// All mutable sequencer state, free of any driver.
pub struct SequencerState {
    pub pattern: Pattern,
    pub ui: Ui,
    pub keyboard: Keyboard,
    pub cursor: StepCursor,
    pub voices: Voices,
}

impl SequencerState {
    pub fn new(config: &Config) -> SequencerState {
        SequencerState {
            pattern: Pattern::new(),
            ui: Ui::new(),
            keyboard: Keyboard::new(config.long_press),
            cursor: StepCursor::new(),
            voices: Voices::new(),
        }
    }

    pub fn handle(&mut self, event: KeyEvent) -> Effect {
        let (ui, mutation) = self.ui.handle(event, &self.pattern);
        let mode_changed = ui.mode != self.ui.mode;
        self.ui = ui;

        match mutation {
            Some(Mutation::Cycle { channel, note, step }) => {
                let cell = self.pattern.cycle(channel, note, step);
                log::debug!(
                    "channel {} note {} step {} -> {:?}",
                    channel.value(),
                    note.value(),
                    step.value(),
                    cell
                );
                Effect::CellChanged { step, cell }
            }
            Some(Mutation::Reset) => {
                self.pattern.clear();
                Effect::Reset
            }
            None if mode_changed => Effect::ModeChanged,
            None => Effect::None,
        }
    }

    /// One sub-tick worth of input: classify the sample, dispatch the events
    /// in key order, then apply the release guard of `Wait`. Returns whether
    /// a reset was requested.
    pub fn sample(&mut self, raw: [bool; 16], now: Instant) -> bool {
        let mut reset = false;
        for event in self.keyboard.update(raw, now).iter() {
            reset |= self.handle(event) == Effect::Reset;
        }
        self.ui = self.ui.settle(self.keyboard.all_idle());
        reset
    }
}

/// Streak of consecutive steps whose MIDI output failed. Any other step
/// outcome, LED failures included, ends the streak.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MidiFailures {
    count: u8,
    limit: u8,
}

impl MidiFailures {
    pub const fn new(limit: u8) -> MidiFailures {
        MidiFailures { count: 0, limit }
    }

    pub const fn count(&self) -> u8 {
        self.count
    }

    /// Record one step result; `true` once the streak reaches the limit.
    pub fn record(&mut self, result: &Result<()>) -> bool {
        self.count = match result {
            Err(Error::Transport(Transport::Midi)) => self.count.saturating_add(1),
            _ => 0,
        };
        self.count >= self.limit
    }
}

pub struct Sequencer<B, W, M> {
    config: Config,
    state: SequencerState,
    buttons: B,
    leds: LedDriver<W>,
    midi: M,
    next_step_at: Option<Instant>,
}

impl<B, W, M> Sequencer<B, W, M>
where
    B: ButtonMatrix,
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: Debug,
    M: MidiOut,
{
    pub fn new(config: Config, buttons: B, leds: W, midi: M) -> Result<Self> {
        config.validate()?;
        Ok(Sequencer {
            state: SequencerState::new(&config),
            leds: LedDriver::new(leds, config.brightness),
            config,
            buttons,
            midi,
            next_step_at: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SequencerState {
        &mut self.state
    }

    pub fn pattern(&self) -> &Pattern {
        &self.state.pattern
    }

    pub fn mode(&self) -> &UiMode {
        &self.state.ui.mode
    }

    pub fn buttons_mut(&mut self) -> &mut B {
        &mut self.buttons
    }

    pub fn leds(&self) -> &LedDriver<W> {
        &self.leds
    }

    pub fn leds_mut(&mut self) -> &mut LedDriver<W> {
        &mut self.leds
    }

    pub fn midi_mut(&mut self) -> &mut M {
        &mut self.midi
    }

    /// Silence whatever a previous run left playing and schedule the first
    /// step for `now`.
    pub fn start(&mut self, now: Instant) -> Result<()> {
        log::info!(
            "start: step {} ms, long press {} ms",
            self.config.step_period.ticks(),
            self.config.long_press.ticks()
        );
        self.next_step_at = Some(now);
        self.leds.clear();
        let leds = self.write_leds();
        self.all_notes_off().and(leds)
    }

    /// Sub-tick: sample the keys and run the mode state machine.
    pub fn poll(&mut self, now: Instant) -> Result<()> {
        let raw = match self.buttons.read() {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("button read failed: {:?}", e);
                return Err(Error::Transport(Transport::Buttons));
            }
        };

        if self.state.sample(raw, now) {
            return self.all_notes_off();
        }
        Ok(())
    }

    /// Step boundary: advance, emit note changes, then redraw. A MIDI failure
    /// does not skip the redraw and an LED failure does not skip MIDI.
    pub fn step(&mut self) -> Result<()> {
        let step = self.state.cursor.advance();
        log::trace!("step {}", step.value());

        let midi = player::emit(
            &self.state.pattern,
            &self.config,
            self.state.cursor,
            &mut self.state.voices,
            &mut self.midi,
        );

        let leds = match led::render(&self.state.ui, &self.state.pattern, step) {
            Some(frame) => {
                self.leds.set_frame(frame);
                self.write_leds()
            }
            None => Ok(()),
        };

        midi.map(|_| ()).and(leds)
    }

    /// Perform the step boundary due by `now`, if any, then poll the keys
    /// once. Both run even if one fails; the first error is returned.
    ///
    /// At most one step plays per call. After a stall longer than a step
    /// period the missed steps are dropped and the grid restarts from `now`.
    pub fn run_until(&mut self, now: Instant) -> Result<()> {
        let mut result = Ok(());

        let mut next = *self.next_step_at.get_or_insert(now);
        if next <= now {
            result = self.step();
            next += self.config.step_period;
            if next <= now {
                log::warn!("stalled for {} ms, skipping missed steps", (now - next).ticks());
                next = now + self.config.step_period;
            }
        }
        self.next_step_at = Some(next);

        result.and(self.poll(now))
    }

    /// Final note-off sweep before the loop stops.
    pub fn shutdown(&mut self) -> Result<()> {
        log::info!("shutdown");
        self.next_step_at = None;
        self.all_notes_off()
    }

    fn all_notes_off(&mut self) -> Result<()> {
        self.state.voices.clear();
        player::all_notes_off(&self.config, &mut self.midi)
    }

    fn write_leds(&mut self) -> Result<()> {
        self.leds.write().map_err(|e| {
            log::warn!("led write failed: {:?}", e);
            Error::Transport(Transport::Leds)
        })
    }
}
