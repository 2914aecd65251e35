//! Step player: advances the step cursor and turns cell changes into MIDI.

use crate::config::Config;
use crate::constants::CHANNELS_COUNT;
use crate::error::{Error, Result, Transport};
use crate::outputs::MidiOut;
use crate::pattern::{Channel, NoteCell, NoteIndex, Pattern, Step};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepCursor {
    pub current: Step,
    pub previous: Step,
}

impl Default for StepCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl StepCursor {
    /// Parked on the last step so the first advance plays step 0.
    pub const fn new() -> StepCursor {
        StepCursor {
            current: Step::wrapping(15),
            previous: Step::wrapping(14),
        }
    }

    pub fn advance(&mut self) -> Step {
        self.previous = self.current;
        self.current = self.current.next();
        self.current
    }
}

/// Notes that got a note-on and no note-off since, one bit per note row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Voices {
    channels: [u16; CHANNELS_COUNT],
}

impl Voices {
    pub const fn new() -> Voices {
        Voices {
            channels: [0; CHANNELS_COUNT],
        }
    }

    pub fn is_sounding(&self, channel: Channel, note: NoteIndex) -> bool {
        self.channels[channel.index()] & (1 << note.index()) != 0
    }

    fn start(&mut self, channel: Channel, note: NoteIndex) {
        self.channels[channel.index()] |= 1 << note.index();
    }

    fn stop(&mut self, channel: Channel, note: NoteIndex) {
        self.channels[channel.index()] &= !(1 << note.index());
    }

    pub fn clear(&mut self) {
        self.channels = [0; CHANNELS_COUNT];
    }

    pub fn is_silent(&self) -> bool {
        self.channels.iter().all(|notes| *notes == 0)
    }
}

/// MIDI message needed when playback moves from `previous` to `current`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    NoteOn,
    NoteOff,
}

/// `sounding` covers a run that was erased while it played: its cells read
/// `Off` already, but the note-off is still owed.
pub const fn transition(previous: NoteCell, current: NoteCell, sounding: bool) -> Option<Transition> {
    match (previous, current, sounding) {
        (_, NoteCell::On, _) => Some(Transition::NoteOn),
        (NoteCell::On | NoteCell::Hold, NoteCell::Off, _) | (_, NoteCell::Off, true) => {
            Some(Transition::NoteOff)
        }
        _ => None,
    }
}

/// Send the note-on/off messages for every channel and note row. A failed
/// message does not stop the remaining ones; the first failure is reported
/// once everything was attempted. Returns the number of messages sent.
pub fn emit<M: MidiOut>(
    pattern: &Pattern,
    config: &Config,
    cursor: StepCursor,
    voices: &mut Voices,
    midi: &mut M,
) -> Result<usize> {
    let mut sent = 0;
    let mut failed = false;

    for channel in Channel::all() {
        for note in NoteIndex::all() {
            let previous = pattern.get(channel, note, cursor.previous);
            let current = pattern.get(channel, note, cursor.current);
            let result = match transition(previous, current, voices.is_sounding(channel, note)) {
                Some(Transition::NoteOn) => {
                    voices.start(channel, note);
                    midi.note_on(channel, config.midi_note(note), config.velocity)
                }
                Some(Transition::NoteOff) => midi
                    .note_off(channel, config.midi_note(note))
                    .map(|()| voices.stop(channel, note)),
                None => continue,
            };
            match result {
                Ok(()) => sent += 1,
                Err(e) => {
                    log::warn!("midi write failed on channel {}: {:?}", channel.value(), e);
                    failed = true;
                }
            }
        }
    }

    if failed {
        return Err(Error::Transport(Transport::Midi));
    }
    Ok(sent)
}

/// Note-off for all 256 channel/note pairs, regardless of what is playing.
pub fn all_notes_off<M: MidiOut>(config: &Config, midi: &mut M) -> Result<()> {
    let mut failed = false;
    for channel in Channel::all() {
        for note in NoteIndex::all() {
            if let Err(e) = midi.note_off(channel, config.midi_note(note)) {
                log::warn!("midi write failed on channel {}: {:?}", channel.value(), e);
                failed = true;
            }
        }
    }
    if failed {
        return Err(Error::Transport(Transport::Midi));
    }
    Ok(())
}
