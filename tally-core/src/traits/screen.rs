//! Screen line trait
//!
//! The e-paper controller shows one of several pre-rendered screens, selected
//! by a discrete signal line per screen. Content rendering happens on the
//! display side; this core only chooses which line is asserted.

use crate::state::StateId;

/// Set of screen select lines, keyed by the state owning each screen
pub trait ScreenLines {
    /// Assert or deassert the line belonging to `screen`
    ///
    /// Unknown identifiers are ignored.
    fn set_line(&mut self, screen: StateId, asserted: bool);

    /// Check whether the line belonging to `screen` is asserted
    fn is_asserted(&self, screen: StateId) -> bool;
}
