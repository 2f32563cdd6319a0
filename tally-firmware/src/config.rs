//! Device configuration generated from device.toml

#[allow(unused_imports)]
use tally_core::config::{DeviceConfig, IndicatorConfig};
#[allow(unused_imports)]
use tally_core::tracking::TimeStamp;

include!(concat!(env!("OUT_DIR"), "/device_config.rs"));
