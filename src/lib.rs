//! Core of a 4x4 grid MIDI step sequencer.
//!
//! A button matrix edits a 16-step pattern per channel and note row, a chain
//! of 16 smart LEDs shows it, and note-on/off messages go out on a fixed step
//! clock. The crate is `no_std` and owns no hardware: the button matrix, LED
//! chain and MIDI port are handed in behind [`ButtonMatrix`],
//! [`smart_leds::SmartLedsWrite`] and [`MidiOut`].
//!
//! - [`pattern`]: 16 channels x 16 notes x 16 steps of `Off`/`On`/`Hold` cells
//! - [`keyboard`]: press, long-press and release detection
//! - [`mode`]: pattern editing, note and channel choosers, release guard
//! - [`player`]: step cursor and note-on/off diffing
//! - [`led`]: per-mode LED frames
//! - [`sequencer`]: the tick loop tying it together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;
pub mod inputs;
pub mod keyboard;
pub mod led;
pub mod mode;
pub mod outputs;
pub mod pattern;
pub mod player;
pub mod sequencer;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{Error, Result, Transport};
pub use inputs::{ButtonMatrix, I2cExpander};
pub use keyboard::{Instant, Key, KeyAction, KeyEvent, KeyState, Keyboard};
pub use led::{Frame, LedDriver};
pub use mode::{Mutation, Ui, UiMode};
pub use outputs::{MidiOut, SerialMidi};
pub use pattern::{Channel, NoteCell, NoteIndex, Pattern, Step};
pub use player::{StepCursor, Voices};
pub use sequencer::{Effect, MidiFailures, Sequencer, SequencerState};
