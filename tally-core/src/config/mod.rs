//! Device configuration types
//!
//! Values are fixed at build time: the firmware's build script turns
//! `device.toml` into a `DeviceConfig` constant.

pub mod types;

pub use types::*;
