//! Real-time clock drivers

pub mod pcf8523;

pub use pcf8523::Pcf8523;
