//! Input poll loop
//!
//! Samples both buttons, hands the result to the state machine, reports any
//! fault on the activity LED and sleeps for the poll interval. Everything
//! runs on this one task; ledger writes and clock reads block it.

use defmt::*;
use embassy_time::{Instant, Timer};

use tally_core::config::{BlinkPattern, DeviceConfig};
use tally_core::state::{StateId, StateMachine, Transition};
use tally_hal::OutputPin;

use crate::boards::{BadgeButtons, FeatherRp2040};

/// Poll task - runs the device until power-off
#[embassy_executor::task]
pub async fn poll_task(
    mut machine: StateMachine<FeatherRp2040>,
    mut buttons: BadgeButtons,
    config: DeviceConfig,
) {
    info!("Poll task started");

    let start = Instant::now();

    loop {
        let now_ms = start.elapsed().as_millis() as u32;
        let sample = buttons.sample(now_ms);

        match machine.poll(sample) {
            Ok(Some(transition)) => log_transition(&machine, transition),
            Ok(None) => {}
            Err(e) => {
                error!("State machine failed: {}", e);
                defmt::panic!("Halting");
            }
        }

        if let Some(fault) = machine.take_fault() {
            let ledger = machine.context().ledger();
            warn!(
                "Fault: {} ({=u32} of {=u32} appends failed)",
                fault,
                ledger.failed_appends(),
                ledger.appends().wrapping_add(ledger.failed_appends())
            );
            let pattern = config.indicator.pattern(fault);
            blink(machine.context_mut().ledger_mut().indicator_mut(), pattern).await;
        }

        Timer::after_millis(config.poll_interval_ms as u64).await;
    }
}

fn log_transition(machine: &StateMachine<FeatherRp2040>, transition: Transition) {
    match transition.from {
        Some(from) => info!("{} -> {}", from, transition.to),
        None => info!("-> {}", transition.to),
    }

    let tracking = machine.context().tracking();
    if transition.to == StateId::TRACKING_1 {
        if let Some(time_in) = tracking.time_in() {
            debug!("Time in: {}", time_in);
        }
    } else if transition.to == StateId::VOICE_NOTE {
        if let Some(time_out) = tracking.time_out() {
            debug!("Time out: {}", time_out);
        }
    }
}

async fn blink(led: &mut impl OutputPin, pattern: BlinkPattern) {
    for _ in 0..pattern.pulses {
        led.set_high();
        Timer::after_millis(pattern.on_ms as u64).await;
        led.set_low();
        Timer::after_millis(pattern.off_ms as u64).await;
    }
}
