//! E-paper screen selection
//!
//! The display board holds one pre-rendered screen per device state and
//! shows whichever one has its select line asserted.

pub mod lines;

pub use lines::ScreenLineBank;
