//! Feather RP2040 + Adalogger FeatherWing wiring
//!
//! | Function            | Feather pin | GPIO  |
//! |---------------------|-------------|-------|
//! | Button 1            | D5          | GP7   |
//! | Button 2            | D6          | GP8   |
//! | Home screen         | D4          | GP6   |
//! | Profile 1 screen    | A0          | GP26  |
//! | Tracking1 screen    | A1          | GP27  |
//! | Focus Timer 1 screen| A2          | GP28  |
//! | Profile 2 screen    | A3          | GP29  |
//! | Voice Note screen   | D24         | GP24  |
//! | Record screen       | D25         | GP25  |
//! | Activity LED        | D13         | GP13  |
//! | RTC SDA / SCL       | SDA / SCL   | GP2 / GP3 (I2C1) |
//! | SD SCK / MO / MI    | SCK/MO/MI   | GP18 / GP19 / GP20 (SPI0) |
//! | SD chip select      | D10         | GP10  |

use defmt::*;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::{I2C1, SPI0};
use embassy_rp::spi::{self, Spi};
use embassy_rp::Peripherals;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::SdCard;

use tally_core::config::DeviceConfig;
use tally_core::state::StateId;
use tally_core::traits::{Board, HardwareFault, LedgerError};
use tally_drivers::indicator::ActivityLed;
use tally_drivers::input::Buttons;
use tally_drivers::rtc::Pcf8523;
use tally_drivers::screen::ScreenLineBank;
use tally_drivers::storage::{FixedTimeSource, SdLedger};
use tally_hal_rp2040::{RpInput, RpOutput};

/// SD cards must be initialised at 400 kHz or less
const SD_INIT_FREQUENCY: u32 = 400_000;

/// SPI clock once the card has left its identification phase
const SD_RUN_FREQUENCY: u32 = 16_000_000;

/// RTC bus speed
const I2C_FREQUENCY: u32 = 100_000;

pub type ScreenBank = ScreenLineBank<RpOutput<'static>, 7>;
pub type Rtc = Pcf8523<I2c<'static, I2C1, Blocking>>;
pub type SdDevice = ExclusiveDevice<Spi<'static, SPI0, spi::Blocking>, Output<'static>, Delay>;
pub type SdSink = SdLedger<SdCard<SdDevice, Delay>, FixedTimeSource>;
pub type Led = ActivityLed<RpOutput<'static>>;
pub type BadgeButtons = Buttons<RpInput<'static>, RpInput<'static>>;

/// Concrete hardware of the badge
pub struct FeatherRp2040;

impl Board for FeatherRp2040 {
    type Screens = ScreenBank;
    type Clock = Rtc;
    type Sink = SdSink;
    type Indicator = Led;
}

/// Initialised peripherals, ready to be handed to the state machine
pub struct Hardware {
    pub buttons: BadgeButtons,
    pub screens: ScreenBank,
    pub rtc: Rtc,
    pub sink: SdSink,
    pub led: Led,
}

/// Bring up every peripheral
///
/// Fails if the RTC does not answer or the SD card has no usable volume.
pub fn init(p: Peripherals, config: &DeviceConfig) -> Result<Hardware, HardwareFault> {
    let buttons = Buttons::new(
        RpInput::pull_up(p.PIN_7),
        RpInput::pull_up(p.PIN_8),
        config.debounce_ms,
    );

    let screens = ScreenLineBank::new(
        [
            (StateId::HOME, RpOutput::new(p.PIN_6)),
            (StateId::PROFILE_1, RpOutput::new(p.PIN_26)),
            (StateId::TRACKING_1, RpOutput::new(p.PIN_27)),
            (StateId::FOCUS_TIMER_1, RpOutput::new(p.PIN_28)),
            (StateId::PROFILE_2, RpOutput::new(p.PIN_29)),
            (StateId::VOICE_NOTE, RpOutput::new(p.PIN_24)),
            (StateId::RECORD, RpOutput::new(p.PIN_25)),
        ],
        config.screen_active_high,
    );

    let led = ActivityLed::new(RpOutput::new(p.PIN_13), config.indicator.inverted);

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY;
    let i2c = I2c::new_blocking(p.I2C1, p.PIN_3, p.PIN_2, i2c_config);
    let mut rtc = Pcf8523::new(i2c)?;
    info!("RTC found");

    if let Some(seed) = config.clock_seed {
        rtc.set_datetime(&seed)?;
        info!(
            "RTC set to {=u16}-{=u8}-{=u8} {=u8}:{=u8}:{=u8}",
            seed.year(),
            seed.month(),
            seed.day(),
            seed.hour(),
            seed.minute(),
            seed.second()
        );
    } else if rtc.lost_power()? {
        warn!("RTC lost power; timestamps are unreliable until the clock is seeded");
    }
    let boot_time = rtc.datetime()?;

    let mut spi_config = spi::Config::default();
    spi_config.frequency = SD_INIT_FREQUENCY;
    let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_20, spi_config);
    let cs = Output::new(p.PIN_10, Level::High);
    let device = ExclusiveDevice::new(spi, cs, Delay).map_err(|_| LedgerError::Device)?;
    let card = SdCard::new(device, Delay);
    let card_bytes = card.num_bytes().map_err(|e| {
        error!("SD card did not initialise: {}", Debug2Format(&e));
        LedgerError::Device
    })?;
    card.spi(|dev| dev.bus_mut().set_frequency(SD_RUN_FREQUENCY));
    info!(
        "SD card ready, {=u64} MB, SPI at {=u32} Hz",
        card_bytes / 1_000_000,
        SD_RUN_FREQUENCY
    );

    let mut sink = SdLedger::new(card, FixedTimeSource::new(boot_time), config.ledger_file);
    sink.mount()?;
    info!("SD card mounted, ledger file {=str}", sink.file_name());

    Ok(Hardware {
        buttons,
        screens,
        rtc,
        sink,
        led,
    })
}
