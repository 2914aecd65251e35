//! Press, long-press and release detection for the 4x4 button matrix.

use fugit::{MillisDurationU64, TimerInstantU64};

use crate::constants::*;
use crate::pattern::{Channel, NoteIndex, Step};

pub type Instant = TimerInstantU64<1_000>;

/// Physical button position, 0..16, row-major as the LEDs are wired.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Key(u8);

impl Key {
    pub const fn new(index: u8) -> Option<Key> {
        if (index as usize) < KEYBOARD_KEY_COUNT {
            Some(Key(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Note or channel index selected by this key in the chooser modes.
    pub const fn mapped(self) -> u8 {
        KEY_MAP[self.0 as usize]
    }

    /// Step under this key in pattern mode.
    pub const fn step(self) -> Step {
        Step::wrapping(self.0)
    }

    pub const fn note(self) -> NoteIndex {
        NoteIndex::wrapping(self.mapped())
    }

    pub const fn channel(self) -> Channel {
        Channel::wrapping(self.mapped())
    }

    pub fn all() -> impl Iterator<Item = Key> {
        (0..KEYBOARD_KEY_COUNT as u8).map(Key)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Pressed,
    LongPressed,
    Released,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
}

/// Latched logical state of one key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Idle,
    Down,
    DownLong,
}

#[derive(Copy, Clone, Debug, Default)]
struct Button {
    pressed_at: Option<Instant>,
    state: KeyState,
}

/// Events produced by one sample, at most one per key, in key order.
#[derive(Clone, Debug, Default)]
pub struct KeyEvents {
    events: [Option<KeyEvent>; KEYBOARD_KEY_COUNT],
}

impl KeyEvents {
    pub fn iter(&self) -> impl Iterator<Item = KeyEvent> + '_ {
        self.events.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.events.iter().all(Option::is_none)
    }
}

pub struct Keyboard {
    buttons: [Button; KEYBOARD_KEY_COUNT],
    long_press: MillisDurationU64,
}

impl Keyboard {
    pub fn new(long_press: MillisDurationU64) -> Keyboard {
        Keyboard {
            buttons: [Button::default(); KEYBOARD_KEY_COUNT],
            long_press,
        }
    }

    pub fn state(&self, key: Key) -> KeyState {
        self.buttons[key.index()].state
    }

    pub fn all_idle(&self) -> bool {
        self.buttons.iter().all(|b| b.state == KeyState::Idle)
    }

    /// Compare a raw sample against the previous one and classify every key.
    pub fn update(&mut self, sample: [bool; KEYBOARD_KEY_COUNT], now: Instant) -> KeyEvents {
        let mut events = KeyEvents::default();

        for (key, (button, pressed)) in Key::all().zip(self.buttons.iter_mut().zip(sample)) {
            let action = match (button.state, pressed) {
                (KeyState::Idle, true) => {
                    button.pressed_at = Some(now);
                    button.state = KeyState::Down;
                    Some(KeyAction::Pressed)
                }
                (KeyState::Down, true) => {
                    let held = button
                        .pressed_at
                        .and_then(|at| now.checked_duration_since(at));
                    match held {
                        Some(held) if held > self.long_press => {
                            button.state = KeyState::DownLong;
                            Some(KeyAction::LongPressed)
                        }
                        _ => None,
                    }
                }
                (KeyState::Down | KeyState::DownLong, false) => {
                    button.pressed_at = None;
                    button.state = KeyState::Idle;
                    Some(KeyAction::Released)
                }
                (KeyState::DownLong, true) | (KeyState::Idle, false) => None,
            };

            if let Some(action) = action {
                log::debug!("key {} {:?}", key.value(), action);
                events.events[key.index()] = Some(KeyEvent { key, action });
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fugit::ExtU64;

    fn at(ms: u64) -> Instant {
        Instant::from_ticks(ms)
    }

    fn only(key: u8) -> [bool; 16] {
        let mut sample = [false; 16];
        sample[key as usize] = true;
        sample
    }

    fn actions(events: &KeyEvents) -> Vec<(u8, KeyAction)> {
        events.iter().map(|e| (e.key.value(), e.action)).collect()
    }

    #[test]
    fn press_and_release_emit_once() {
        let mut keyboard = Keyboard::new(500.millis());
        let events = keyboard.update(only(4), at(0));
        assert_eq!(actions(&events), [(4, KeyAction::Pressed)]);
        assert_eq!(keyboard.state(Key::new(4).unwrap()), KeyState::Down);

        for t in 1..100 {
            assert!(keyboard.update(only(4), at(t)).is_empty());
        }

        let events = keyboard.update([false; 16], at(100));
        assert_eq!(actions(&events), [(4, KeyAction::Released)]);
        assert!(keyboard.all_idle());
        assert!(keyboard.update([false; 16], at(101)).is_empty());
    }

    #[test]
    fn long_press_fires_once_after_threshold() {
        let mut keyboard = Keyboard::new(500.millis());
        keyboard.update(only(15), at(0));
        assert!(keyboard.update(only(15), at(500)).is_empty());

        let events = keyboard.update(only(15), at(501));
        assert_eq!(actions(&events), [(15, KeyAction::LongPressed)]);
        assert_eq!(keyboard.state(Key::new(15).unwrap()), KeyState::DownLong);

        for t in 502..2000 {
            assert!(keyboard.update(only(15), at(t)).is_empty());
        }
        let events = keyboard.update([false; 16], at(2000));
        assert_eq!(actions(&events), [(15, KeyAction::Released)]);
    }

    #[test]
    fn simultaneous_keys_come_out_in_index_order() {
        let mut keyboard = Keyboard::new(500.millis());
        let mut sample = [false; 16];
        sample[9] = true;
        sample[2] = true;
        sample[14] = true;
        let events = keyboard.update(sample, at(0));
        assert_eq!(
            actions(&events),
            [(2, KeyAction::Pressed), (9, KeyAction::Pressed), (14, KeyAction::Pressed)]
        );
    }

    #[test]
    fn press_always_separated_by_release() {
        // pseudo-random chatter on one key
        let mut keyboard = Keyboard::new(20.millis());
        let mut seed = 0x2545_f491u32;
        let mut down = false;
        for t in 0..5000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let pressed = seed % 3 == 0;
            for event in keyboard.update(only_if(7, pressed), at(t)).iter() {
                match event.action {
                    KeyAction::Pressed => {
                        assert!(!down);
                        down = true;
                    }
                    KeyAction::Released => {
                        assert!(down);
                        down = false;
                    }
                    KeyAction::LongPressed => assert!(down),
                }
            }
        }
    }

    fn only_if(key: u8, pressed: bool) -> [bool; 16] {
        if pressed {
            only(key)
        } else {
            [false; 16]
        }
    }

    #[test]
    fn key_map_is_a_permutation() {
        let mut seen = [false; 16];
        for key in Key::all() {
            seen[key.mapped() as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(Key::new(0).unwrap().mapped(), 12);
        assert_eq!(Key::new(15).unwrap().mapped(), 3);
        assert_eq!(Key::new(16), None);
    }
}
