//! State identifiers

use core::fmt;

/// Name of a registered state
///
/// Used as the registry key and as the target of every transition. The name
/// also selects the screen line a state owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(&'static str);

impl StateId {
    pub const HOME: StateId = StateId::new("Home");
    pub const PROFILE_1: StateId = StateId::new("Profile 1");
    pub const TRACKING_1: StateId = StateId::new("Tracking1");
    pub const FOCUS_TIMER_1: StateId = StateId::new("Focus Timer 1");
    pub const PROFILE_2: StateId = StateId::new("Profile 2");
    pub const VOICE_NOTE: StateId = StateId::new("Voice Note");
    pub const RECORD: StateId = StateId::new("Record");

    /// Every identifier of the standard state set, in registration order
    pub const STANDARD: [StateId; 7] = [
        StateId::HOME,
        StateId::PROFILE_1,
        StateId::TRACKING_1,
        StateId::FOCUS_TIMER_1,
        StateId::PROFILE_2,
        StateId::VOICE_NOTE,
        StateId::RECORD,
    ];

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateId {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.0)
    }
}
