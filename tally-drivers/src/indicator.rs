//! Activity indicator LED
//!
//! Lit while a ledger write is in progress and used for fault blink
//! patterns in between.

use tally_hal::OutputPin;

/// LED with configurable polarity, driven in logical on/off terms
pub struct ActivityLed<P> {
    pin: P,
    /// If true, LED on = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin> ActivityLed<P> {
    /// Create the indicator, initially off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut led = Self {
            pin,
            inverted,
            on: false,
        };
        led.set_low();
        led
    }
}

impl<P: OutputPin> OutputPin for ActivityLed<P> {
    fn set_high(&mut self) {
        self.on = true;
        if self.inverted {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
    }

    fn set_low(&mut self) {
        self.on = false;
        if self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    fn is_set_high(&self) -> bool {
        self.on
    }
}
