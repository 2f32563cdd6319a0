//! Time tracking model
//!
//! Timestamps captured from the clock and the per-session context that
//! carries them from the state that captures them to the states that read
//! them later.

pub mod context;
pub mod timestamp;

pub use context::TrackingContext;
pub use timestamp::{ClockTime, TimeStamp, UsDate};
