use core::convert::Infallible;

use keypad::embedded_hal::digital::v2::InputPin;
use keypad::{keypad_new, keypad_struct};
use stm32f1xx_hal::{
    gpio::{
        gpioa::{PA0, PA1, PA2, PA3, PA7},
        gpiob::{PB12, PB13, PB14, PB15},
        Alternate, Input, OpenDrain, Output, PullUp, PushPull,
    },
    pac::{SPI1, USART1},
    serial::Tx,
    spi::{NoMiso, NoSck, Spi, Spi1NoRemap},
};
use ws2812_spi::Ws2812;

use gridseq::constants::KEYBOARD_KEY_COUNT;
use gridseq::{ButtonMatrix, SerialMidi};

// initialise keyboard
keypad_struct! {
    pub struct Keypad<Error = Infallible> {
        rows: (
            PA0<Input<PullUp>>,
            PA1<Input<PullUp>>,
            PA2<Input<PullUp>>,
            PA3<Input<PullUp>>,
        ),
        columns: (
            PB12<Output<OpenDrain>>,
            PB13<Output<OpenDrain>>,
            PB14<Output<OpenDrain>>,
            PB15<Output<OpenDrain>>,
        ),
    }
}

pub type LedPins = (NoSck, NoMiso, PA7<Alternate<PushPull>>);

pub type Leds = Ws2812<Spi<SPI1, Spi1NoRemap, LedPins, u8>>;
pub type Midi = SerialMidi<Tx<USART1>>;
pub type Sequencer = gridseq::Sequencer<Matrix, Leds, Midi>;

/// 4x4 key matrix scanned one column at a time.
pub struct Matrix {
    keypad: Keypad,
}

impl Matrix {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        r0: PA0<Input<PullUp>>,
        r1: PA1<Input<PullUp>>,
        r2: PA2<Input<PullUp>>,
        r3: PA3<Input<PullUp>>,
        c0: PB12<Output<OpenDrain>>,
        c1: PB13<Output<OpenDrain>>,
        c2: PB14<Output<OpenDrain>>,
        c3: PB15<Output<OpenDrain>>,
    ) -> Matrix {
        Matrix {
            keypad: keypad_new!(Keypad {
                rows: (r0, r1, r2, r3),
                columns: (c0, c1, c2, c3),
            }),
        }
    }
}

impl ButtonMatrix for Matrix {
    type Error = Infallible;

    // key index is row * 4 + column, matching the LED chain order
    fn read(&mut self) -> Result<[bool; KEYBOARD_KEY_COUNT], Infallible> {
        let mut pressed = [false; KEYBOARD_KEY_COUNT];
        for (row_index, row) in self.keypad.decompose().iter().enumerate() {
            for (col_index, k) in row.iter().enumerate() {
                pressed[row_index * 4 + col_index] = k.is_low()?;
            }
        }
        Ok(pressed)
    }
}
