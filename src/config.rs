use fugit::{ExtU64, MillisDurationU64};

use crate::constants::*;
use crate::error::{Error, Result};

/// Timing and output settings of the sequencer.
///
/// Built with [`Config::default`] or [`Config::from_bpm`] and tweaked with the
/// `with_*` setters. [`crate::Sequencer::new`] rejects a config that does not
/// pass [`Config::validate`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    pub step_period: MillisDurationU64,
    pub poll_period: MillisDurationU64,
    pub long_press: MillisDurationU64,
    pub velocity: u8,
    pub base_note: u8,
    pub brightness: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            step_period: STEP_PERIOD_MS.millis(),
            poll_period: KEYBOARD_REFRESH_MS.millis(),
            long_press: LONG_PRESS_MS.millis(),
            velocity: NOTE_VELOCITY,
            base_note: BASE_NOTE,
            brightness: LED_BRIGHTNESS,
        }
    }
}

impl Config {
    pub const MIN_BPM: u32 = 20;
    pub const MAX_BPM: u32 = 300;

    /// Step period for sixteenth notes at the given tempo.
    pub fn from_bpm(bpm: u32) -> Result<Config> {
        if !(Self::MIN_BPM..=Self::MAX_BPM).contains(&bpm) {
            return Err(Error::InvalidConfig("bpm out of range 20..=300"));
        }
        let d = 60_000 / (bpm as u64 * 4);
        Ok(Config::default().with_step_period(d.millis()))
    }

    pub fn with_step_period(mut self, period: MillisDurationU64) -> Self {
        self.step_period = period;
        self
    }

    pub fn with_poll_period(mut self, period: MillisDurationU64) -> Self {
        self.poll_period = period;
        self
    }

    pub fn with_long_press(mut self, threshold: MillisDurationU64) -> Self {
        self.long_press = threshold;
        self
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_base_note(mut self, note: u8) -> Self {
        self.base_note = note;
        self
    }

    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_period.ticks() == 0 {
            return Err(Error::InvalidConfig("poll period must be non-zero"));
        }
        if self.step_period <= self.poll_period {
            return Err(Error::InvalidConfig("step period must exceed poll period"));
        }
        if self.long_press.ticks() == 0 {
            return Err(Error::InvalidConfig("long press threshold must be non-zero"));
        }
        if !(1..=127).contains(&self.velocity) {
            return Err(Error::InvalidConfig("velocity out of range 1..=127"));
        }
        if self.base_note as usize + NOTES_COUNT - 1 > 127 {
            return Err(Error::InvalidConfig("base note leaves the MIDI note range"));
        }
        Ok(())
    }

    /// MIDI note number for a note row.
    pub fn midi_note(&self, note: crate::pattern::NoteIndex) -> u8 {
        self.base_note + note.index() as u8
    }
}
