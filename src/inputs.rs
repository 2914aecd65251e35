use core::fmt::Debug;

use embedded_hal::blocking::i2c::WriteRead;

use crate::constants::KEYBOARD_KEY_COUNT;

/// Source of raw button samples, `true` meaning pressed. A read must not
/// block longer than one poll period.
pub trait ButtonMatrix {
    type Error: Debug;

    fn read(&mut self) -> Result<[bool; KEYBOARD_KEY_COUNT], Self::Error>;
}

impl<B: ButtonMatrix + ?Sized> ButtonMatrix for &mut B {
    type Error = B::Error;

    fn read(&mut self) -> Result<[bool; KEYBOARD_KEY_COUNT], Self::Error> {
        (**self).read()
    }
}

/// Decode a 16-bit port expander word; inputs are pulled up, so a pressed
/// key reads as a cleared bit.
pub fn decode_active_low(word: u16) -> [bool; KEYBOARD_KEY_COUNT] {
    let mut pressed = [false; KEYBOARD_KEY_COUNT];
    for (i, p) in pressed.iter_mut().enumerate() {
        *p = word & (1 << i) == 0;
    }
    pressed
}

/// 16-bit I2C port expander (TCA9555 style) with one key per input pin.
pub struct I2cExpander<I> {
    i2c: I,
    address: u8,
}

impl<I> I2cExpander<I> {
    pub const DEFAULT_ADDRESS: u8 = 0x20;
    const INPUT_PORT_0: u8 = 0x00;

    pub fn new(i2c: I, address: u8) -> I2cExpander<I> {
        I2cExpander { i2c, address }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: WriteRead> ButtonMatrix for I2cExpander<I>
where
    I::Error: Debug,
{
    type Error = I::Error;

    fn read(&mut self) -> Result<[bool; KEYBOARD_KEY_COUNT], Self::Error> {
        let mut port = [0u8; 2];
        self.i2c
            .write_read(self.address, &[Self::INPUT_PORT_0], &mut port)?;
        Ok(decode_active_low(u16::from_le_bytes(port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleared_bits_are_pressed() {
        assert_eq!(decode_active_low(0xffff), [false; 16]);
        let pressed = decode_active_low(!0b1000_0000_0000_0101);
        assert!(pressed[0] && pressed[2] && pressed[15]);
        assert_eq!(pressed.iter().filter(|p| **p).count(), 3);
    }

    struct Bus {
        port: [u8; 2],
        last: Option<(u8, u8)>,
    }

    impl WriteRead for Bus {
        type Error = ();

        fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), ()> {
            self.last = Some((address, bytes[0]));
            buffer.copy_from_slice(&self.port);
            Ok(())
        }
    }

    #[test]
    fn expander_reads_both_ports() {
        let bus = Bus {
            port: [0b1111_1110, 0b0111_1111],
            last: None,
        };
        let mut expander = I2cExpander::new(bus, I2cExpander::<Bus>::DEFAULT_ADDRESS);
        let pressed = expander.read().unwrap();
        assert!(pressed[0]);
        assert!(pressed[15]);
        assert_eq!(pressed.iter().filter(|p| **p).count(), 2);
        assert_eq!(expander.release().last, Some((0x20, 0x00)));
    }
}
