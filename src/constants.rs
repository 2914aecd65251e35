use smart_leds::RGB8;

// sequencer
pub const STEPS_COUNT: usize = 16;
pub const NOTES_COUNT: usize = 16;
pub const CHANNELS_COUNT: usize = 16;
pub const CELLS_COUNT: usize = CHANNELS_COUNT * NOTES_COUNT * STEPS_COUNT;
pub const PERCUSSION_CHANNEL: u8 = 9;
pub const BASE_NOTE: u8 = 36;
pub const NOTE_VELOCITY: u8 = 120;
pub const NOTE_OFF_VELOCITY: u8 = 64;
pub const STEP_PERIOD_MS: u64 = 105;

// keyboard
pub const KEYBOARD_KEY_COUNT: usize = 16;
pub const KEYBOARD_REFRESH_MS: u64 = 1;
pub const LONG_PRESS_MS: u64 = 500;

// key index -> note/channel index, the 4x4 grid read bottom row first
pub const KEY_MAP: [u8; KEYBOARD_KEY_COUNT] = [12, 13, 14, 15, 8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3];

// pattern mode keys with a long-press gesture
pub const RESET_KEY: u8 = 3;
pub const CHANNEL_KEY: u8 = 12;
pub const NOTE_KEY: u8 = 15;

// firmware
pub const MAX_MIDI_FAILURES: u8 = 8;

// leds
pub const LED_COUNT: usize = 16;
pub const LED_BRIGHTNESS: u8 = 128;

pub const LED_KICK_COLOR: RGB8 = RGB8 { r: 127, g: 0, b: 0 };
pub const LED_SNARE_COLOR: RGB8 = RGB8 { r: 0, g: 127, b: 0 };
pub const LED_CLAP_COLOR: RGB8 = RGB8 { r: 127, g: 0, b: 127 };
pub const LED_HIHAT_COLOR: RGB8 = RGB8 { r: 0, g: 127, b: 127 };
pub const LED_TOM_COLOR: RGB8 = RGB8 { r: 127, g: 63, b: 0 };
pub const LED_CYMBAL_COLOR: RGB8 = RGB8 { r: 0, g: 0, b: 192 };

pub const LED_MAJOR_COLOR: RGB8 = RGB8 { r: 0, g: 0, b: 192 };
pub const LED_SCALE_COLOR: RGB8 = RGB8 { r: 0, g: 63, b: 63 };
pub const LED_ACCIDENTAL_COLOR: RGB8 = RGB8 { r: 63, g: 0, b: 63 };

pub const LED_CHANNEL_COLOR: RGB8 = RGB8 { r: 127, g: 127, b: 0 };
pub const LED_PERCUSSION_CHANNEL_COLOR: RGB8 = RGB8 { r: 0, g: 127, b: 0 };

pub const LED_MARKER_COLOR: RGB8 = RGB8 { r: 16, g: 16, b: 16 };
pub const LED_ACTIVE_NOTE_COLOR: RGB8 = RGB8 { r: 255, g: 255, b: 255 };
pub const LED_NOTE_OFF_COLOR: RGB8 = RGB8 { r: 7, g: 0, b: 0 };
pub const LED_OFF_COLOR: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

// General MIDI drum voices from note 36 up
pub const LED_PERCUSSION_NOTE_COLOR: [RGB8; NOTES_COUNT] = [
    LED_KICK_COLOR,
    LED_SNARE_COLOR,
    LED_SNARE_COLOR,
    LED_CLAP_COLOR,
    LED_SNARE_COLOR,
    LED_TOM_COLOR,
    LED_HIHAT_COLOR,
    LED_TOM_COLOR,
    LED_HIHAT_COLOR,
    LED_TOM_COLOR,
    LED_HIHAT_COLOR,
    LED_TOM_COLOR,
    LED_TOM_COLOR,
    LED_CYMBAL_COLOR,
    LED_TOM_COLOR,
    LED_CYMBAL_COLOR,
];

// chromatic from C: C major triad, other scale tones, accidentals
pub const LED_MELODIC_NOTE_COLOR: [RGB8; NOTES_COUNT] = [
    LED_MAJOR_COLOR,
    LED_ACCIDENTAL_COLOR,
    LED_SCALE_COLOR,
    LED_ACCIDENTAL_COLOR,
    LED_MAJOR_COLOR,
    LED_SCALE_COLOR,
    LED_ACCIDENTAL_COLOR,
    LED_MAJOR_COLOR,
    LED_ACCIDENTAL_COLOR,
    LED_SCALE_COLOR,
    LED_ACCIDENTAL_COLOR,
    LED_SCALE_COLOR,
    LED_MAJOR_COLOR,
    LED_ACCIDENTAL_COLOR,
    LED_SCALE_COLOR,
    LED_ACCIDENTAL_COLOR,
];
