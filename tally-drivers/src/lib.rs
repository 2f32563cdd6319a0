//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the collaborators the
//! tally-core state machine drives:
//!
//! - Debounced push-button inputs
//! - PCF8523 real-time clock (I2C)
//! - Screen select line bank and the activity indicator
//! - Ledger file on a FAT-formatted SD card

#![no_std]
#![deny(unsafe_code)]

pub mod indicator;
pub mod input;
pub mod rtc;
pub mod screen;
pub mod storage;
