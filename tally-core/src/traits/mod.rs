//! Hardware abstraction traits
//!
//! These traits define the interface between the state machine and the
//! hardware-specific collaborators it drives.

pub mod clock;
pub mod ledger;
pub mod screen;

pub use clock::{ClockError, ClockSource};
pub use ledger::{LedgerError, LedgerSink};
pub use screen::ScreenLines;

use tally_hal::OutputPin;

/// Bundle of concrete hardware types for one board
///
/// Implemented by a marker type in the firmware (and by fakes in tests) so
/// the state machine can be written once against the associated types.
pub trait Board {
    /// One output line per state screen
    type Screens: ScreenLines;
    /// Real-time clock
    type Clock: ClockSource;
    /// Append-only ledger storage
    type Sink: LedgerSink;
    /// Activity indicator asserted around ledger writes
    type Indicator: OutputPin;
}

/// Startup failure of a hardware collaborator
///
/// Fatal: the firmware must not enter the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareFault {
    /// Real-time clock did not respond
    Clock(ClockError),
    /// Storage card could not be initialised or the ledger prepared
    Storage(LedgerError),
}

impl From<ClockError> for HardwareFault {
    fn from(e: ClockError) -> Self {
        HardwareFault::Clock(e)
    }
}

impl From<LedgerError> for HardwareFault {
    fn from(e: LedgerError) -> Self {
        HardwareFault::Storage(e)
    }
}
