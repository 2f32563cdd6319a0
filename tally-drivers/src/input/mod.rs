//! Push-button inputs
//!
//! Raw pins are debounced per channel and reduced to one
//! [`InputSample`](tally_core::state::InputSample) per poll cycle.

pub mod debounce;

pub use debounce::{Buttons, Debouncer};
