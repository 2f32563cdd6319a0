//! RP2040-specific HAL for the time-tracking badge
//!
//! Adapts embassy-rp GPIO drivers to the shared `tally-hal` pin traits so
//! the board-agnostic drivers can run on the Feather RP2040.

#![no_std]

pub mod gpio;

pub use gpio::{RpInput, RpOutput};
