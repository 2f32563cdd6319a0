//! Board-agnostic core logic for the time-tracking badge
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (clock, screen lines, ledger storage)
//! - State machine and the seven device states
//! - Time-in / time-out tracking model
//! - Ledger record format and the append protocol
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod ledger;
pub mod state;
pub mod tracking;
pub mod traits;
