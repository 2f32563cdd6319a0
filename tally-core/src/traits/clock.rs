//! Real-time clock trait

use crate::tracking::TimeStamp;

/// Errors from the clock source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Bus transaction with the clock chip failed
    Bus,
    /// The chip returned register contents that are not a valid date/time
    InvalidTime,
}

/// Point-in-time source
///
/// Takes `&mut self` because reading an RTC is a bus transaction.
pub trait ClockSource {
    /// Read the current calendar date and time
    fn now(&mut self) -> Result<TimeStamp, ClockError>;
}
