//! Screen select line bank
//!
//! One GPIO output per state screen, with configurable polarity.

use tally_core::state::StateId;
use tally_core::traits::ScreenLines;
use tally_hal::OutputPin;

/// Fixed set of screen select lines keyed by state
pub struct ScreenLineBank<P, const N: usize> {
    lines: [(StateId, P); N],
    asserted: [bool; N],
    /// If true, asserted = pin HIGH
    active_high: bool,
}

impl<P: OutputPin, const N: usize> ScreenLineBank<P, N> {
    /// Create the bank with every line deasserted
    pub fn new(lines: [(StateId, P); N], active_high: bool) -> Self {
        let mut bank = Self {
            lines,
            asserted: [false; N],
            active_high,
        };
        for i in 0..N {
            bank.drive(i, false);
        }
        bank
    }

    fn drive(&mut self, index: usize, asserted: bool) {
        self.asserted[index] = asserted;
        self.lines[index].1.set_state(asserted == self.active_high);
    }

    fn index_of(&self, screen: StateId) -> Option<usize> {
        self.lines.iter().position(|(id, _)| *id == screen)
    }
}

impl<P: OutputPin, const N: usize> ScreenLines for ScreenLineBank<P, N> {
    fn set_line(&mut self, screen: StateId, asserted: bool) {
        if let Some(index) = self.index_of(screen) {
            self.drive(index, asserted);
        }
    }

    fn is_asserted(&self, screen: StateId) -> bool {
        self.index_of(screen).is_some_and(|i| self.asserted[i])
    }
}
