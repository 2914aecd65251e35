//! Scripted drivers for unit tests.

use std::vec::Vec;

use smart_leds::{SmartLedsWrite, RGB8};

use crate::inputs::ButtonMatrix;
use crate::outputs::MidiOut;
use crate::pattern::Channel;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Message {
    On(u8, u8, u8),
    Off(u8, u8),
}

#[derive(Default)]
pub struct RecordingMidi {
    messages: Vec<Message>,
    attempts: usize,
    fail_at: Option<usize>,
    pub fail: bool,
}

impl RecordingMidi {
    /// Fail only the n-th message attempted (0-based).
    pub fn failing_on(n: usize) -> RecordingMidi {
        RecordingMidi {
            fail_at: Some(n),
            ..Default::default()
        }
    }

    pub fn take(&mut self) -> Vec<Message> {
        core::mem::take(&mut self.messages)
    }

    fn record(&mut self, message: Message) -> Result<(), ()> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail || self.fail_at == Some(attempt) {
            return Err(());
        }
        self.messages.push(message);
        Ok(())
    }
}

impl MidiOut for RecordingMidi {
    type Error = ();

    fn note_on(&mut self, channel: Channel, note: u8, velocity: u8) -> Result<(), ()> {
        self.record(Message::On(channel.value(), note, velocity))
    }

    fn note_off(&mut self, channel: Channel, note: u8) -> Result<(), ()> {
        self.record(Message::Off(channel.value(), note))
    }
}

#[derive(Default)]
pub struct RecordingLeds {
    pub frames: Vec<Vec<RGB8>>,
    pub fail: bool,
}

impl SmartLedsWrite for RecordingLeds {
    type Error = ();
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), ()>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        if self.fail {
            return Err(());
        }
        self.frames.push(iterator.into_iter().map(Into::into).collect());
        Ok(())
    }
}

/// Button matrix whose keys are pressed and released by the test.
#[derive(Default)]
pub struct ScriptedButtons {
    pressed: [bool; 16],
    pub fail: bool,
}

impl ScriptedButtons {
    pub fn press(&mut self, key: u8) {
        self.pressed[key as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.pressed[key as usize] = false;
    }

    pub fn release_all(&mut self) {
        self.pressed = [false; 16];
    }
}

impl ButtonMatrix for ScriptedButtons {
    type Error = ();

    fn read(&mut self) -> Result<[bool; 16], ()> {
        if self.fail {
            return Err(());
        }
        Ok(self.pressed)
    }
}
