//! Ledger storage on removable media

pub mod sd_ledger;

pub use sd_ledger::{FixedTimeSource, SdLedger};
