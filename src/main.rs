#![deny(unsafe_code)]
#![no_main]
#![no_std]

use panic_rtt_target as _;

use rtic::app;
use rtt_target::{rprintln, rtt_init_print};

use embedded_hal::spi::{Mode, Phase, Polarity};

pub const MODE: Mode = Mode {
    phase: Phase::CaptureOnSecondTransition,
    polarity: Polarity::IdleHigh,
};

pub const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

mod board;
mod rtt_logger;

#[app(device = stm32f1xx_hal::pac, peripherals = true, dispatchers = [TAMPER])]
mod app {
    use super::*;
    use fugit::MillisDurationU64;
    use stm32f1xx_hal::{
        prelude::*,
        serial::{Config as SerialConfig, Serial},
        spi::{NoMiso, NoSck, Spi},
    };
    use systick_monotonic::*;
    use ws2812_spi::Ws2812;

    use gridseq::constants::MAX_MIDI_FAILURES;
    use gridseq::{Config, Instant, MidiFailures, SerialMidi};

    use crate::board;

    #[shared]
    struct Shared {
        sequencer: board::Sequencer,
    }

    #[local]
    struct Local {
        poll_period: MillisDurationU64,
        step_period: MillisDurationU64,
    }

    #[monotonic(binds = SysTick, default = true)]
    type MonoTimer = Systick<1_000>; // 1 kHz / 1 ms granularity

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        rtt_init_print!();
        rtt_logger::init(LOG_LEVEL);
        rprintln!("init");

        let mut flash = cx.device.FLASH.constrain();
        let rcc = cx.device.RCC.constrain();
        let mut afio = cx.device.AFIO.constrain();

        let clocks = rcc
            .cfgr
            .use_hse(8.MHz())
            .sysclk(72.MHz())
            .pclk1(36.MHz())
            .freeze(&mut flash.acr);

        let mut gpioa = cx.device.GPIOA.split();
        let mut gpiob = cx.device.GPIOB.split();

        // LED chain
        let pins_led = (
            NoSck,
            NoMiso,
            gpioa.pa7.into_alternate_push_pull(&mut gpioa.crl),
        );
        let spi_led = Spi::spi1(
            cx.device.SPI1,
            pins_led,
            &mut afio.mapr,
            MODE,
            3.MHz(),
            clocks,
        );
        let leds = Ws2812::new(spi_led);

        // DIN MIDI out
        let pins_midi = (
            gpioa.pa9.into_alternate_push_pull(&mut gpioa.crh),
            gpioa.pa10,
        );
        let serial = Serial::usart1(
            cx.device.USART1,
            pins_midi,
            &mut afio.mapr,
            SerialConfig::default().baudrate(31_250.bps()),
            clocks,
        );
        let (tx, _rx) = serial.split();

        // key matrix
        let matrix = board::Matrix::new(
            gpioa.pa0.into_pull_up_input(&mut gpioa.crl),
            gpioa.pa1.into_pull_up_input(&mut gpioa.crl),
            gpioa.pa2.into_pull_up_input(&mut gpioa.crl),
            gpioa.pa3.into_pull_up_input(&mut gpioa.crl),
            gpiob.pb12.into_open_drain_output(&mut gpiob.crh),
            gpiob.pb13.into_open_drain_output(&mut gpiob.crh),
            gpiob.pb14.into_open_drain_output(&mut gpiob.crh),
            gpiob.pb15.into_open_drain_output(&mut gpiob.crh),
        );

        // systick
        let mono = Systick::new(cx.core.SYST, 72_000_000);

        let config = Config::default();
        rprintln!("step: {:?} ms", config.step_period.ticks());

        let mut sequencer = match board::Sequencer::new(config, matrix, leds, SerialMidi::new(tx)) {
            Ok(sequencer) => sequencer,
            Err(e) => panic!("{}", e),
        };
        // the monotonic starts counting at zero
        if let Err(e) = sequencer.start(Instant::from_ticks(0)) {
            log::warn!("start: {}", e);
        }

        tick::spawn(Instant::from_ticks(0)).ok();
        inputs::spawn().ok();

        (
            Shared { sequencer },
            Local {
                poll_period: config.poll_period,
                step_period: config.step_period,
            },
            init::Monotonics(mono),
        )
    }

    // sub-tick: sample keys and run the mode state machine
    #[task(local = [poll_period], shared = [sequencer])]
    fn inputs(mut cx: inputs::Context) {
        let now = monotonics::now();
        cx.shared.sequencer.lock(|sequencer| {
            if let Err(e) = sequencer.poll(now) {
                log::warn!("poll: {}", e);
            }
        });
        inputs::spawn_after(*cx.local.poll_period).ok();
    }

    // step boundary, rescheduled from its own instant so the tempo does not drift
    #[task(
        local = [step_period, midi_failures: MidiFailures = MidiFailures::new(MAX_MIDI_FAILURES)],
        shared = [sequencer]
    )]
    fn tick(mut cx: tick::Context, instant: Instant) {
        let midi_failures = cx.local.midi_failures;
        cx.shared.sequencer.lock(|sequencer| {
            let result = sequencer.step();
            if midi_failures.record(&result) {
                sequencer.shutdown().ok();
                panic!("MIDI transport lost");
            }
            if let Err(e) = result {
                log::warn!("step: {}", e);
            }
        });

        let next_instant = instant + *cx.local.step_period;
        tick::spawn_at(next_instant, next_instant).ok();
    }
}
