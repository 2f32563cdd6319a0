//! NXP PCF8523 real-time clock
//!
//! Blocking I2C driver for the battery-backed RTC on the Adalogger
//! FeatherWing. Time registers are BCD encoded; the clock runs in 24-hour
//! mode with years counted from 2000.

use embedded_hal::i2c::I2c;
use tally_core::tracking::TimeStamp;
use tally_core::traits::{ClockError, ClockSource};

/// 7-bit I2C address
pub const ADDRESS: u8 = 0x68;

/// Register addresses
mod reg {
    pub const CONTROL_1: u8 = 0x00;
    pub const CONTROL_3: u8 = 0x02;
    pub const SECONDS: u8 = 0x03;
}

/// Control_1: oscillator stopped by software
const CONTROL_1_STOP: u8 = 1 << 5;
/// Control_1: 12-hour mode select
const CONTROL_1_12H: u8 = 1 << 3;
/// Seconds: oscillator was interrupted since the flag was last cleared
const SECONDS_OS: u8 = 1 << 7;
/// Control_3: battery switch-over in standard mode, low detection on
const CONTROL_3_STANDARD: u8 = 0x00;

/// PCF8523 on an I2C bus
pub struct Pcf8523<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Pcf8523<I2C> {
    /// Check that the chip answers and make sure it runs in 24-hour mode
    ///
    /// Fails if nothing acknowledges at [`ADDRESS`].
    pub fn new(i2c: I2C) -> Result<Self, ClockError> {
        let mut rtc = Self { i2c };
        let control = rtc.read_register(reg::CONTROL_1)?;
        if control & CONTROL_1_12H != 0 {
            rtc.write_register(reg::CONTROL_1, control & !CONTROL_1_12H)?;
        }
        Ok(rtc)
    }

    /// Read the current date and time
    pub fn datetime(&mut self) -> Result<TimeStamp, ClockError> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(ADDRESS, &[reg::SECONDS], &mut regs)
            .map_err(|_| ClockError::Bus)?;

        let second = bcd_decode(regs[0] & 0x7F)?;
        let minute = bcd_decode(regs[1] & 0x7F)?;
        let hour = bcd_decode(regs[2] & 0x3F)?;
        let day = bcd_decode(regs[3] & 0x3F)?;
        // regs[4] is the weekday
        let month = bcd_decode(regs[5] & 0x1F)?;
        let year = 2000 + bcd_decode(regs[6])? as u16;

        TimeStamp::new(year, month, day, hour, minute, second).ok_or(ClockError::InvalidTime)
    }

    /// Set the clock, restart the oscillator and clear the power-loss flag
    ///
    /// Only years 2000 through 2099 can be stored.
    pub fn set_datetime(&mut self, t: &TimeStamp) -> Result<(), ClockError> {
        if !(2000..=2099).contains(&t.year()) {
            return Err(ClockError::InvalidTime);
        }

        let frame = [
            reg::SECONDS,
            bcd_encode(t.second()),
            bcd_encode(t.minute()),
            bcd_encode(t.hour()),
            bcd_encode(t.day()),
            t.weekday(),
            bcd_encode(t.month()),
            bcd_encode((t.year() - 2000) as u8),
        ];
        self.i2c.write(ADDRESS, &frame).map_err(|_| ClockError::Bus)?;
        self.write_register(reg::CONTROL_3, CONTROL_3_STANDARD)?;
        self.start()
    }

    /// Clear the software stop bit so the clock runs
    pub fn start(&mut self) -> Result<(), ClockError> {
        let control = self.read_register(reg::CONTROL_1)?;
        if control & CONTROL_1_STOP != 0 {
            self.write_register(reg::CONTROL_1, control & !CONTROL_1_STOP)?;
        }
        Ok(())
    }

    /// Whether the oscillator stopped since the time was last set
    ///
    /// True after the backup battery ran flat or was removed; the time is
    /// not trustworthy until [`set_datetime`](Self::set_datetime) is called.
    pub fn lost_power(&mut self) -> Result<bool, ClockError> {
        Ok(self.read_register(reg::SECONDS)? & SECONDS_OS != 0)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, ClockError> {
        let mut value = [0u8];
        self.i2c
            .write_read(ADDRESS, &[register], &mut value)
            .map_err(|_| ClockError::Bus)?;
        Ok(value[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), ClockError> {
        self.i2c
            .write(ADDRESS, &[register, value])
            .map_err(|_| ClockError::Bus)
    }
}

impl<I2C: I2c> ClockSource for Pcf8523<I2C> {
    fn now(&mut self) -> Result<TimeStamp, ClockError> {
        self.datetime()
    }
}

fn bcd_decode(value: u8) -> Result<u8, ClockError> {
    let (tens, ones) = (value >> 4, value & 0x0F);
    if tens > 9 || ones > 9 {
        return Err(ClockError::InvalidTime);
    }
    Ok(tens * 10 + ones)
}

fn bcd_encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
