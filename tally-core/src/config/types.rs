//! Configuration type definitions

use crate::state::Fault;
use crate::tracking::TimeStamp;

/// Maximum ledger file name length (8.3 short name)
pub const MAX_FILE_NAME_LEN: usize = 12;

/// Indicator blink pattern played after a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkPattern {
    /// Number of pulses
    pub pulses: u8,
    /// Indicator on time per pulse (ms)
    pub on_ms: u32,
    /// Indicator off time after each pulse (ms)
    pub off_ms: u32,
}

impl BlinkPattern {
    /// Total time the pattern takes to play (ms)
    pub const fn duration_ms(&self) -> u32 {
        self.pulses as u32 * (self.on_ms + self.off_ms)
    }
}

/// Fault indication settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorConfig {
    /// If true, LED on = pin LOW
    pub inverted: bool,
    /// Pulses for a failed ledger write
    pub ledger_fault_pulses: u8,
    /// Pulses for a failed clock read
    pub clock_fault_pulses: u8,
    /// Pulse on time (ms)
    pub on_ms: u32,
    /// Gap after each pulse (ms)
    pub off_ms: u32,
}

impl IndicatorConfig {
    /// Blink pattern for `fault`
    pub const fn pattern(&self, fault: Fault) -> BlinkPattern {
        let pulses = match fault {
            Fault::Ledger(_) => self.ledger_fault_pulses,
            Fault::Clock(_) => self.clock_fault_pulses,
        };
        BlinkPattern {
            pulses,
            on_ms: self.on_ms,
            off_ms: self.off_ms,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Delay between input polls (ms)
    pub poll_interval_ms: u32,
    /// Button debounce window (ms)
    pub debounce_ms: u32,
    /// Ledger file in the card's root directory
    pub ledger_file: &'static str,
    /// Written to the RTC at boot when set
    pub clock_seed: Option<TimeStamp>,
    /// Screen select lines are asserted high (false: asserted low)
    pub screen_active_high: bool,
    pub indicator: IndicatorConfig,
}

impl DeviceConfig {
    pub const DEFAULT: DeviceConfig = DeviceConfig {
        poll_interval_ms: 125,
        debounce_ms: 10,
        ledger_file: "STAMP.CSV",
        clock_seed: None,
        screen_active_high: true,
        indicator: IndicatorConfig {
            inverted: false,
            ledger_fault_pulses: 3,
            clock_fault_pulses: 2,
            on_ms: 100,
            off_ms: 150,
        },
    };
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Check that `name` is a valid FAT 8.3 short file name
///
/// Up to eight characters, an optional dot and up to three extension
/// characters, all from the uppercase alphanumeric set plus `_` and `-`.
pub const fn is_short_file_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_FILE_NAME_LEN {
        return false;
    }

    let mut stem = 0;
    let mut ext = 0;
    let mut dot = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'.' {
            if dot || stem == 0 {
                return false;
            }
            dot = true;
        } else if b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_' || b == b'-' {
            if dot {
                ext += 1;
            } else {
                stem += 1;
            }
        } else {
            return false;
        }
        i += 1;
    }

    stem <= 8 && ext <= 3 && !(dot && ext == 0)
}
