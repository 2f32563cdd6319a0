//! Tally - Time-Tracking Badge Firmware
//!
//! Main firmware binary for the Feather RP2040 badge. Two buttons walk a
//! seven-state menu; starting and stopping a tracking session stamps the
//! time from the RTC into a CSV ledger on the SD card, while an external
//! e-paper board shows the screen selected by the active state.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use tally_core::ledger::Ledger;
use tally_core::state::{Context, StateId, StateMachine};

mod boards;
mod config;
mod tasks;

use crate::config::DEVICE_CONFIG;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tally firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = DEVICE_CONFIG;
    info!(
        "Config: poll {=u32} ms, debounce {=u32} ms, ledger {=str}",
        config.poll_interval_ms,
        config.debounce_ms,
        config.ledger_file
    );

    let hw = match boards::init(p, &config) {
        Ok(hw) => hw,
        Err(e) => {
            error!("Hardware init failed: {}", e);
            defmt::panic!("Halting");
        }
    };

    let mut ledger = Ledger::new(hw.sink, hw.led);
    match ledger.init() {
        Ok(true) => info!("New ledger, header written"),
        Ok(false) => info!("Appending to existing ledger"),
        Err(e) => {
            error!("Ledger init failed: {}", e);
            defmt::panic!("Halting");
        }
    }

    let ctx = Context::new(hw.screens, hw.rtc, ledger);
    let mut machine = match StateMachine::with_standard_states(ctx) {
        Ok(machine) => machine,
        Err(e) => {
            error!("State registry invalid: {}", e);
            defmt::panic!("Halting");
        }
    };
    if let Err(e) = machine.start(StateId::HOME) {
        error!("State machine start failed: {}", e);
        defmt::panic!("Halting");
    }
    info!("State machine started in {}", StateId::HOME);

    unwrap!(spawner.spawn(tasks::poll_task(machine, hw.buttons, config)));
}
