use core::fmt::Debug;

use embedded_hal::serial::Write;
use midi_types::{MidiMessage, Note, Value7};

use crate::constants::NOTE_OFF_VELOCITY;
use crate::pattern::Channel;

/// Fire-and-forget MIDI note output.
pub trait MidiOut {
    type Error: Debug;

    fn note_on(&mut self, channel: Channel, note: u8, velocity: u8) -> Result<(), Self::Error>;

    fn note_off(&mut self, channel: Channel, note: u8) -> Result<(), Self::Error>;
}

impl<M: MidiOut + ?Sized> MidiOut for &mut M {
    type Error = M::Error;

    fn note_on(&mut self, channel: Channel, note: u8, velocity: u8) -> Result<(), Self::Error> {
        (**self).note_on(channel, note, velocity)
    }

    fn note_off(&mut self, channel: Channel, note: u8) -> Result<(), Self::Error> {
        (**self).note_off(channel, note)
    }
}

fn midi_channel(channel: Channel) -> midi_types::Channel {
    midi_types::Channel::from(channel.value())
}

pub fn note_on(channel: Channel, note: u8, velocity: u8) -> MidiMessage {
    MidiMessage::NoteOn(midi_channel(channel), Note::from(note), Value7::from(velocity))
}

pub fn note_off(channel: Channel, note: u8) -> MidiMessage {
    MidiMessage::NoteOff(midi_channel(channel), Note::from(note), Value7::from(NOTE_OFF_VELOCITY))
}

/// DIN MIDI over a UART transmitter (31250 baud, 8N1).
pub struct SerialMidi<TX> {
    out: embedded_midi::MidiOut<TX>,
}

impl<TX> SerialMidi<TX>
where
    TX: Write<u8>,
    TX::Error: Debug,
{
    pub fn new(tx: TX) -> SerialMidi<TX> {
        SerialMidi {
            out: embedded_midi::MidiOut::new(tx),
        }
    }
}

impl<TX> MidiOut for SerialMidi<TX>
where
    TX: Write<u8>,
    TX::Error: Debug,
{
    type Error = TX::Error;

    fn note_on(&mut self, channel: Channel, note: u8, velocity: u8) -> Result<(), Self::Error> {
        self.out.write(&note_on(channel, note, velocity))
    }

    fn note_off(&mut self, channel: Channel, note: u8) -> Result<(), Self::Error> {
        self.out.write(&note_off(channel, note))
    }
}
