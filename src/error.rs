use core::fmt;

/// Which external capability failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transport {
    Buttons,
    Leds,
    Midi,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Buttons => f.write_str("button matrix"),
            Transport::Leds => f.write_str("LED strip"),
            Transport::Midi => f.write_str("MIDI"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0} transport failed")]
    Transport(Transport),
    #[error("index {0} is out of range 0..16")]
    InvalidIndex(u8),
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
