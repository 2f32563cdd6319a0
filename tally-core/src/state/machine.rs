//! State machine core
//!
//! The registry is filled once before [`StateMachine::start`] and never
//! changes afterwards. After start exactly one state is active; before it
//! none is.

use heapless::Vec;

use super::{Behavior, Context, Fault, InputEvent, InputSample, State, StateId};
use crate::traits::Board;

/// Registry capacity
pub const MAX_STATES: usize = 7;

/// Errors building or starting the machine
///
/// All of these are fatal at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A state with this name is already registered
    DuplicateState(StateId),
    /// The registry has no room for another state
    RegistryFull,
    /// Registration or start attempted after the machine started
    AlreadyStarted,
    /// The initial state or a transition target is not registered
    MissingState(StateId),
}

/// Errors raised while running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineError {
    Config(ConfigError),
    /// Transition to a name that is not in the registry
    UnknownState(StateId),
}

impl From<ConfigError> for MachineError {
    fn from(e: ConfigError) -> Self {
        MachineError::Config(e)
    }
}

/// A committed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    /// State that was exited, `None` for the initial transition
    pub from: Option<StateId>,
    pub to: StateId,
}

/// Registry of states plus the single active one
pub struct StateMachine<B: Board> {
    registry: Vec<Behavior, MAX_STATES>,
    active: Option<usize>,
    ctx: Context<B>,
}

impl<B: Board> StateMachine<B> {
    /// Create an empty, unstarted machine
    pub fn new(ctx: Context<B>) -> Self {
        Self {
            registry: Vec::new(),
            active: None,
            ctx,
        }
    }

    /// Create a machine with all seven standard states registered
    pub fn with_standard_states(ctx: Context<B>) -> Result<Self, ConfigError> {
        let mut machine = Self::new(ctx);
        for state in Behavior::standard() {
            machine.register(state)?;
        }
        Ok(machine)
    }

    /// Add a state to the registry
    pub fn register(&mut self, state: impl Into<Behavior>) -> Result<(), ConfigError> {
        if self.active.is_some() {
            return Err(ConfigError::AlreadyStarted);
        }
        let state = state.into();
        if self.index_of(state.name()).is_some() {
            return Err(ConfigError::DuplicateState(state.name()));
        }
        self.registry.push(state).map_err(|_| ConfigError::RegistryFull)
    }

    /// Check the registry and enter `initial`
    ///
    /// Every target reachable from a registered state must itself be
    /// registered, so no input can later hit an unknown name.
    pub fn start(&mut self, initial: StateId) -> Result<Transition, MachineError> {
        if self.active.is_some() {
            return Err(ConfigError::AlreadyStarted.into());
        }
        self.validate(initial)?;
        self.transition_to(initial)
    }

    fn validate(&self, initial: StateId) -> Result<(), ConfigError> {
        if self.index_of(initial).is_none() {
            return Err(ConfigError::MissingState(initial));
        }
        for state in &self.registry {
            for target in state.targets() {
                if self.index_of(target).is_none() {
                    return Err(ConfigError::MissingState(target));
                }
            }
        }
        Ok(())
    }

    /// Switch to `target`: exit the active state, then enter the new one
    ///
    /// An unknown target fails before the active state is touched.
    pub fn transition_to(&mut self, target: StateId) -> Result<Transition, MachineError> {
        let next = self.index_of(target).ok_or(MachineError::UnknownState(target))?;
        let from = self.active.map(|i| self.registry[i].name());

        if let Some(current) = self.active {
            self.registry[current].exit(&mut self.ctx);
        }
        self.active = Some(next);
        self.registry[next].enter(&mut self.ctx);

        Ok(Transition { from, to: target })
    }

    /// Hand an input edge to the active state
    ///
    /// Does nothing before start.
    pub fn dispatch(&mut self, event: InputEvent) -> Result<Option<Transition>, MachineError> {
        let Some(current) = self.active else {
            return Ok(None);
        };
        match self.registry[current].on_input(&mut self.ctx, event) {
            Some(target) => self.transition_to(target).map(Some),
            None => Ok(None),
        }
    }

    /// Dispatch the event of one polling cycle, if any
    pub fn poll(&mut self, sample: InputSample) -> Result<Option<Transition>, MachineError> {
        match sample.event() {
            Some(event) => self.dispatch(event),
            None => Ok(None),
        }
    }

    /// Name of the active state
    pub fn active(&self) -> Option<StateId> {
        self.active.map(|i| self.registry[i].name())
    }

    pub fn context(&self) -> &Context<B> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context<B> {
        &mut self.ctx
    }

    /// Fault raised by the last dispatch, if any
    pub fn take_fault(&mut self) -> Option<Fault> {
        self.ctx.take_fault()
    }

    fn index_of(&self, name: StateId) -> Option<usize> {
        self.registry.iter().position(|s| s.name() == name)
    }
}
