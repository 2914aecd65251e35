use core::fmt::Debug;

use smart_leds::{brightness, SmartLedsWrite, RGB8};

use crate::constants::*;
use crate::keyboard::Key;
use crate::mode::{Ui, UiMode};
use crate::pattern::{Channel, NoteCell, NoteIndex, Pattern, Step};

pub type Frame = [RGB8; LED_COUNT];

/// Frame buffer in front of a smart LED chain (16 LEDs under the 16 keys).
pub struct LedDriver<W> {
    ws: W,
    pub leds: Frame,
    brightness: u8,
}

impl<W> LedDriver<W>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: Debug,
{
    pub fn new(ws: W, brightness: u8) -> LedDriver<W> {
        LedDriver {
            ws,
            leds: [LED_OFF_COLOR; LED_COUNT],
            brightness,
        }
    }

    pub fn set(&mut self, index: usize, color: RGB8) -> &mut Self {
        if let Some(led) = self.leds.get_mut(index) {
            *led = color;
        }
        self
    }

    pub fn set_frame(&mut self, frame: Frame) -> &mut Self {
        self.leds = frame;
        self
    }

    // switch off all lights
    pub fn clear(&mut self) -> &mut Self {
        self.leds = [LED_OFF_COLOR; LED_COUNT];
        self
    }

    pub fn write(&mut self) -> Result<(), W::Error> {
        self.ws
            .write(brightness(self.leds.iter().cloned(), self.brightness))
    }

    pub fn inner(&self) -> &W {
        &self.ws
    }

    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.ws
    }

    pub fn release(self) -> W {
        self.ws
    }
}

/// Colors for the current mode, or `None` in `Wait` where the previous frame
/// stays up.
pub fn render(ui: &Ui, pattern: &Pattern, step: Step) -> Option<Frame> {
    let mut frame = [LED_OFF_COLOR; LED_COUNT];

    match ui.mode {
        UiMode::Pattern => {
            let track = pattern.track(ui.channel, ui.note);
            for (i, (led, cell)) in frame.iter_mut().zip(track).enumerate() {
                *led = if i == step.index() {
                    match cell {
                        NoteCell::On => LED_ACTIVE_NOTE_COLOR,
                        _ => LED_MARKER_COLOR,
                    }
                } else {
                    match_cell_to_color(ui.channel, ui.note, cell)
                };
            }
        }
        UiMode::NoteChooser { armed } => {
            for ((led, key), armed) in frame.iter_mut().zip(Key::all()).zip(armed) {
                let color = match_note_to_color(ui.channel, key.note());
                *led = if armed { color } else { dim(color) };
            }
        }
        UiMode::ChannelChooser => {
            for (led, key) in frame.iter_mut().zip(Key::all()) {
                *led = match_channel_to_color(key.channel());
            }
        }
        UiMode::Wait => return None,
    }

    Some(frame)
}

pub const fn dim(color: RGB8) -> RGB8 {
    RGB8 {
        r: color.r / 10,
        g: color.g / 10,
        b: color.b / 10,
    }
}

// return RGB color based on a note row and the kind of channel it lives on
fn match_note_to_color(channel: Channel, note: NoteIndex) -> RGB8 {
    if channel.is_percussion() {
        LED_PERCUSSION_NOTE_COLOR[note.index()]
    } else {
        LED_MELODIC_NOTE_COLOR[note.index()]
    }
}

// return RGB color of a step that is not under the cursor
fn match_cell_to_color(channel: Channel, note: NoteIndex, cell: NoteCell) -> RGB8 {
    match (cell, channel.is_percussion()) {
        (NoteCell::On, _) => match_note_to_color(channel, note),
        (NoteCell::Hold, false) => dim(match_note_to_color(channel, note)),
        (NoteCell::Off, false) => LED_NOTE_OFF_COLOR,
        (_, true) => LED_OFF_COLOR,
    }
}

fn match_channel_to_color(channel: Channel) -> RGB8 {
    if channel.is_percussion() {
        LED_PERCUSSION_CHANNEL_COLOR
    } else {
        LED_CHANNEL_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingLeds;

    fn ui(channel: u8, note: u8) -> Ui {
        Ui {
            channel: Channel::new(channel).unwrap(),
            note: NoteIndex::new(note).unwrap(),
            ..Ui::new()
        }
    }

    fn step(v: u8) -> Step {
        Step::new(v).unwrap()
    }

    #[test]
    fn pattern_mode_marks_cursor() {
        let mut pattern = Pattern::new();
        let ui = ui(9, 0);
        pattern.set(ui.channel, ui.note, step(4), NoteCell::On);

        let frame = render(&ui, &pattern, step(0)).unwrap();
        assert_eq!(frame[0], LED_MARKER_COLOR);
        assert_eq!(frame[4], LED_KICK_COLOR);
        assert_eq!(frame[5], LED_OFF_COLOR);

        let frame = render(&ui, &pattern, step(4)).unwrap();
        assert_eq!(frame[4], LED_ACTIVE_NOTE_COLOR);
        assert_eq!(frame[0], LED_OFF_COLOR);
    }

    #[test]
    fn melodic_cells_shade_by_state() {
        let mut pattern = Pattern::new();
        let ui = ui(0, 1);
        pattern.set(ui.channel, ui.note, step(2), NoteCell::On);
        pattern.set(ui.channel, ui.note, step(3), NoteCell::Hold);

        let frame = render(&ui, &pattern, step(10)).unwrap();
        assert_eq!(frame[2], LED_ACCIDENTAL_COLOR);
        assert_eq!(frame[3], dim(LED_ACCIDENTAL_COLOR));
        assert_eq!(frame[4], LED_NOTE_OFF_COLOR);
        assert_eq!(frame[10], LED_MARKER_COLOR);
    }

    #[test]
    fn only_active_row_is_shown() {
        let mut pattern = Pattern::new();
        pattern.set(Channel::PERCUSSION, NoteIndex::new(1).unwrap(), step(6), NoteCell::On);
        let frame = render(&ui(9, 0), &pattern, step(0)).unwrap();
        assert_eq!(frame[6], LED_OFF_COLOR);
    }

    #[test]
    fn note_chooser_dims_unarmed_rows() {
        let mut armed = [false; 16];
        armed[0] = true;
        let ui = Ui {
            mode: UiMode::NoteChooser { armed },
            ..ui(9, 0)
        };
        let frame = render(&ui, &Pattern::new(), step(0)).unwrap();
        // key 0 picks note 12, key 12 picks note 0
        assert_eq!(frame[0], LED_PERCUSSION_NOTE_COLOR[12]);
        assert_eq!(frame[12], dim(LED_KICK_COLOR));
    }

    #[test]
    fn channel_chooser_highlights_percussion() {
        let ui = Ui {
            mode: UiMode::ChannelChooser,
            ..Ui::new()
        };
        let frame = render(&ui, &Pattern::new(), step(0)).unwrap();
        // key 9 maps to channel 5, key 13 to channel 1, key 5 to channel 9
        assert_eq!(frame[5], LED_PERCUSSION_CHANNEL_COLOR);
        assert_eq!(frame.iter().filter(|c| **c == LED_PERCUSSION_CHANNEL_COLOR).count(), 1);
        assert_eq!(frame[13], LED_CHANNEL_COLOR);
    }

    #[test]
    fn wait_keeps_previous_frame() {
        let ui = Ui {
            mode: UiMode::Wait,
            ..Ui::new()
        };
        assert_eq!(render(&ui, &Pattern::new(), step(0)), None);
    }

    #[test]
    fn driver_writes_scaled_frame() {
        let mut driver = LedDriver::new(RecordingLeds::default(), 128);
        driver.clear().set(3, RGB8 { r: 200, g: 100, b: 0 }).set(99, LED_KICK_COLOR);
        driver.write().unwrap();
        let leds = driver.release();
        let frame = leds.frames.last().unwrap();
        assert_eq!(frame.len(), 16);
        assert!((99..=101).contains(&frame[3].r));
        assert_eq!(frame[3].b, 0);
        assert_eq!(frame[0], LED_OFF_COLOR);
    }
}
