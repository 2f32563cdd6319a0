//! Hardware context shared by all states

use crate::ledger::{Ledger, LedgerRecord};
use crate::state::StateId;
use crate::tracking::{TimeStamp, TrackingContext};
use crate::traits::{Board, ClockError, ClockSource, LedgerError, ScreenLines};

/// Recoverable fault raised while handling an input
///
/// Faults never stop a transition. The poll loop collects them after each
/// dispatch and reports them on the activity indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Clock read failed; the timestamp capture and its append were skipped
    Clock(ClockError),
    /// Ledger append failed; the record was dropped
    Ledger(LedgerError),
}

/// Everything a state touches while entering, exiting or handling input
///
/// Constructed once at startup and owned by the state machine.
pub struct Context<B: Board> {
    screens: B::Screens,
    clock: B::Clock,
    ledger: Ledger<B::Sink, B::Indicator>,
    tracking: TrackingContext,
    fault: Option<Fault>,
}

impl<B: Board> Context<B> {
    pub fn new(screens: B::Screens, clock: B::Clock, ledger: Ledger<B::Sink, B::Indicator>) -> Self {
        Self {
            screens,
            clock,
            ledger,
            tracking: TrackingContext::new(),
            fault: None,
        }
    }

    /// Assert the screen line owned by `screen`
    pub fn show(&mut self, screen: StateId) {
        self.screens.set_line(screen, true);
    }

    /// Deassert the screen line owned by `screen`
    pub fn hide(&mut self, screen: StateId) {
        self.screens.set_line(screen, false);
    }

    /// Read the clock, raising [`Fault::Clock`] on failure
    pub fn capture(&mut self) -> Option<TimeStamp> {
        match self.clock.now() {
            Ok(t) => Some(t),
            Err(e) => {
                self.raise(Fault::Clock(e));
                None
            }
        }
    }

    /// Append a record, raising [`Fault::Ledger`] on failure
    pub fn record(&mut self, record: LedgerRecord) {
        if let Err(e) = self.ledger.append(&record) {
            self.raise(Fault::Ledger(e));
        }
    }

    /// Keep the first fault raised since the last [`take_fault`](Self::take_fault)
    pub fn raise(&mut self, fault: Fault) {
        if self.fault.is_none() {
            self.fault = Some(fault);
        }
    }

    pub fn take_fault(&mut self) -> Option<Fault> {
        self.fault.take()
    }

    pub fn tracking(&self) -> &TrackingContext {
        &self.tracking
    }

    pub fn tracking_mut(&mut self) -> &mut TrackingContext {
        &mut self.tracking
    }

    pub fn screens(&self) -> &B::Screens {
        &self.screens
    }

    pub fn ledger(&self) -> &Ledger<B::Sink, B::Indicator> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger<B::Sink, B::Indicator> {
        &mut self.ledger
    }
}
