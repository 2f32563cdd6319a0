//! Device mode state machine
//!
//! A registry of states keyed by [`StateId`], exactly one of which is active
//! once the machine has started. Every transition runs the outgoing state's
//! exit hook to completion before the incoming state's enter hook.

pub mod context;
pub mod events;
#[cfg(test)]
pub(crate) mod fakes;
pub mod id;
pub mod machine;
pub mod states;

pub use context::{Context, Fault};
pub use events::{InputEvent, InputSample};
pub use id::StateId;
pub use machine::{ConfigError, MachineError, StateMachine, Transition, MAX_STATES};
pub use states::{Behavior, FocusTimer1, Home, Profile1, Profile2, Record, State, Tracking1, VoiceNote};
