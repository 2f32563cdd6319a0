//! Time-based input debouncer
//!
//! A raw level has to stay unchanged for the debounce interval before it is
//! accepted. Buttons are wired active-low with pull-ups, so a press shows
//! up as a falling edge of the debounced level.

use tally_core::state::InputSample;
use tally_hal::InputPin;

/// Debounced view of one input pin
pub struct Debouncer<P> {
    pin: P,
    interval_ms: u32,
    /// Accepted level
    stable: bool,
    /// Last raw level seen
    raw: bool,
    /// Time the raw level last changed
    raw_since_ms: u32,
    /// Accepted level changed during the last update
    changed: bool,
}

impl<P: InputPin> Debouncer<P> {
    /// Wrap `pin`, taking its current level as the settled one
    pub fn new(pin: P, interval_ms: u32) -> Self {
        let level = pin.is_high();
        Self {
            pin,
            interval_ms,
            stable: level,
            raw: level,
            raw_since_ms: 0,
            changed: false,
        }
    }

    /// Sample the pin at `now_ms`
    ///
    /// Must be called once per poll cycle; edge flags only describe the
    /// latest call.
    pub fn update(&mut self, now_ms: u32) {
        self.changed = false;

        let level = self.pin.is_high();
        if level != self.raw {
            self.raw = level;
            self.raw_since_ms = now_ms;
        }

        let settled = now_ms.wrapping_sub(self.raw_since_ms) >= self.interval_ms;
        if settled && self.raw != self.stable {
            self.stable = self.raw;
            self.changed = true;
        }
    }

    /// Debounced level
    pub fn value(&self) -> bool {
        self.stable
    }

    /// Debounced level went high → low in the last update
    pub fn fell(&self) -> bool {
        self.changed && !self.stable
    }

    /// Debounced level went low → high in the last update
    pub fn rose(&self) -> bool {
        self.changed && self.stable
    }
}

/// The badge's two buttons
pub struct Buttons<A, B> {
    channel1: Debouncer<A>,
    channel2: Debouncer<B>,
}

impl<A: InputPin, B: InputPin> Buttons<A, B> {
    pub fn new(channel1: A, channel2: B, debounce_ms: u32) -> Self {
        Self {
            channel1: Debouncer::new(channel1, debounce_ms),
            channel2: Debouncer::new(channel2, debounce_ms),
        }
    }

    /// Update both debouncers and report their presses
    pub fn sample(&mut self, now_ms: u32) -> InputSample {
        self.channel1.update(now_ms);
        self.channel2.update(now_ms);
        InputSample::new(self.channel1.fell(), self.channel2.fell())
    }
}
