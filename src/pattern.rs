//! Pattern store: three-state note cells for every channel, note row and step.

use crate::constants::*;
use crate::error::Error;

/// Implements a 0..16 index newtype. The inner value is private so every
/// instance in the program is in range.
macro_rules! index_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u8);

        impl $name {
            pub const COUNT: usize = 16;

            pub const fn new(value: u8) -> Result<$name, Error> {
                if value < 16 {
                    Ok($name(value))
                } else {
                    Err(Error::InvalidIndex(value))
                }
            }

            pub const fn wrapping(value: u8) -> $name {
                $name(value % 16)
            }

            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub const fn value(self) -> u8 {
                self.0
            }

            pub const fn next(self) -> $name {
                $name((self.0 + 1) % 16)
            }

            pub const fn prev(self) -> $name {
                $name((self.0 + 15) % 16)
            }

            pub fn all() -> impl Iterator<Item = $name> + Clone {
                (0..16u8).map($name)
            }
        }

        impl TryFrom<u8> for $name {
            type Error = Error;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                $name::new(value)
            }
        }

        impl From<$name> for u8 {
            fn from(index: $name) -> u8 {
                index.0
            }
        }
    };
}

index_type!(
    /// MIDI channel, 0-based.
    Channel
);
index_type!(
    /// Note row within a channel; MIDI note is `base_note + row`.
    NoteIndex
);
index_type!(
    /// Position within the 16-step cycle.
    Step
);

impl Channel {
    pub const PERCUSSION: Channel = Channel(PERCUSSION_CHANNEL);

    pub const fn is_percussion(self) -> bool {
        self.0 == PERCUSSION_CHANNEL
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NoteCell {
    #[default]
    Off,
    On,
    Hold,
}

impl NoteCell {
    /// Next value in the edit cycle of the given channel: `Off -> On -> Hold -> Off`
    /// for melodic channels, `Off -> On -> Off` for percussion.
    pub const fn cycled(self, channel: Channel) -> NoteCell {
        match (self, channel.is_percussion()) {
            (NoteCell::Off, _) => NoteCell::On,
            (NoteCell::On, true) => NoteCell::Off,
            (NoteCell::On, false) => NoteCell::Hold,
            (NoteCell::Hold, _) => NoteCell::Off,
        }
    }

    pub const fn is_off(self) -> bool {
        matches!(self, NoteCell::Off)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    cells: [NoteCell; CELLS_COUNT],
}

impl Default for Pattern {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern {
    pub const fn new() -> Pattern {
        Pattern {
            cells: [NoteCell::Off; CELLS_COUNT],
        }
    }

    const fn offset(channel: Channel, note: NoteIndex, step: Step) -> usize {
        (channel.index() * NOTES_COUNT + note.index()) * STEPS_COUNT + step.index()
    }

    pub fn get(&self, channel: Channel, note: NoteIndex, step: Step) -> NoteCell {
        self.cells[Self::offset(channel, note, step)]
    }

    /// Advance the cell through its channel's cycle and return the new value.
    pub fn cycle(&mut self, channel: Channel, note: NoteIndex, step: Step) -> NoteCell {
        let cell = &mut self.cells[Self::offset(channel, note, step)];
        *cell = cell.cycled(channel);
        *cell
    }

    /// Write a cell directly. Percussion cells cannot hold, so `Hold` is
    /// stored as `On` there.
    #[cfg(test)]
    pub(crate) fn set(&mut self, channel: Channel, note: NoteIndex, step: Step, cell: NoteCell) {
        let cell = match (cell, channel.is_percussion()) {
            (NoteCell::Hold, true) => NoteCell::On,
            (cell, _) => cell,
        };
        self.cells[Self::offset(channel, note, step)] = cell;
    }

    /// The 16 steps of one note row.
    pub fn track(&self, channel: Channel, note: NoteIndex) -> [NoteCell; STEPS_COUNT] {
        let start = Self::offset(channel, note, Step::default());
        let mut track = [NoteCell::Off; STEPS_COUNT];
        track.copy_from_slice(&self.cells[start..start + STEPS_COUNT]);
        track
    }

    /// Whether the row triggers a note anywhere in the cycle.
    pub fn has_onset(&self, channel: Channel, note: NoteIndex) -> bool {
        self.track(channel, note).contains(&NoteCell::On)
    }

    pub fn clear(&mut self) {
        self.cells = [NoteCell::Off; CELLS_COUNT];
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_off())
    }
}
