//! UI mode state machine.
//!
//! [`Ui::handle`] maps the current mode and one key event to the next mode
//! plus an optional pattern mutation. It never touches the pattern itself, the
//! caller applies the returned [`Mutation`].

use crate::constants::*;
use crate::keyboard::{KeyAction, KeyEvent};
use crate::pattern::{Channel, NoteIndex, Pattern, Step};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UiMode {
    /// Keys edit the active note row, one key per step.
    Pattern,
    /// Next pressed key picks the active note. `armed` is a snapshot, taken on
    /// entry, of which note rows trigger somewhere on the active channel.
    NoteChooser { armed: [bool; NOTES_COUNT] },
    /// Next pressed key picks the active channel.
    ChannelChooser,
    /// Input is ignored until every key is released.
    Wait,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Cycle {
        channel: Channel,
        note: NoteIndex,
        step: Step,
    },
    Reset,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ui {
    pub mode: UiMode,
    pub note: NoteIndex,
    pub channel: Channel,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    pub const fn new() -> Ui {
        Ui {
            mode: UiMode::Pattern,
            note: NoteIndex::wrapping(0),
            channel: Channel::PERCUSSION,
        }
    }

    pub fn handle(self, event: KeyEvent, pattern: &Pattern) -> (Ui, Option<Mutation>) {
        let KeyEvent { key, action } = event;

        match self.mode {
            UiMode::Pattern => {
                let cycle = Mutation::Cycle {
                    channel: self.channel,
                    note: self.note,
                    step: key.step(),
                };
                match (key.value(), action) {
                    (NOTE_KEY, KeyAction::LongPressed) => {
                        let mut armed = [false; NOTES_COUNT];
                        for (a, k) in armed.iter_mut().zip(crate::keyboard::Key::all()) {
                            *a = pattern.has_onset(self.channel, k.note());
                        }
                        (self.with_mode(UiMode::NoteChooser { armed }), None)
                    }
                    (CHANNEL_KEY, KeyAction::LongPressed) => (self.with_mode(UiMode::ChannelChooser), None),
                    (NOTE_KEY | CHANNEL_KEY, KeyAction::Released) => (self, Some(cycle)),
                    (NOTE_KEY | CHANNEL_KEY, _) => (self, None),
                    (RESET_KEY, KeyAction::LongPressed) => {
                        log::info!("reset");
                        (Ui::new(), Some(Mutation::Reset))
                    }
                    (_, KeyAction::Pressed) => (self, Some(cycle)),
                    _ => (self, None),
                }
            }
            UiMode::NoteChooser { .. } => match action {
                KeyAction::Pressed => {
                    let ui = Ui {
                        note: key.note(),
                        ..self
                    };
                    log::info!("note {}", ui.note.value());
                    (ui.with_mode(UiMode::Wait), None)
                }
                _ => (self, None),
            },
            UiMode::ChannelChooser => match action {
                KeyAction::Pressed => {
                    let ui = Ui {
                        note: NoteIndex::wrapping(0),
                        channel: key.channel(),
                        ..self
                    };
                    log::info!("channel {}", ui.channel.value());
                    (ui.with_mode(UiMode::Wait), None)
                }
                _ => (self, None),
            },
            UiMode::Wait => (self, None),
        }
    }

    /// Leave `Wait` once no key is held. Evaluated once per sub-tick, after
    /// the key events of that sub-tick.
    pub fn settle(self, all_idle: bool) -> Ui {
        match self.mode {
            UiMode::Wait if all_idle => self.with_mode(UiMode::Pattern),
            _ => self,
        }
    }

    fn with_mode(self, mode: UiMode) -> Ui {
        log::info!("mode {:?} -> {:?}", ModeName(&self.mode), ModeName(&mode));
        Ui { mode, ..self }
    }
}

/// Mode without the snapshot payload, for logging.
struct ModeName<'a>(&'a UiMode);

impl core::fmt::Debug for ModeName<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self.0 {
            UiMode::Pattern => "Pattern",
            UiMode::NoteChooser { .. } => "NoteChooser",
            UiMode::ChannelChooser => "ChannelChooser",
            UiMode::Wait => "Wait",
        })
    }
}
