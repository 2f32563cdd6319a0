//! Tally Hardware Abstraction Layer
//!
//! This crate defines the digital I/O traits shared by the board-agnostic
//! crates (`tally-core`, `tally-drivers`) and implemented by chip-specific
//! HALs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tally-firmware                         │
//! └─────────────────────────────────────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐   ┌─────────────────┐
//! │ tally-core      │   │ tally-drivers   │
//! └─────────────────┘   └─────────────────┘
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tally-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     ▲
//!                     │
//! ┌─────────────────────────────────────────┐
//! │  tally-hal-rp2040                       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - screen lines, activity indicator
//! - [`gpio::InputPin`] - raw push-button levels

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{InputPin, OutputPin};
