//! The standard device states
//!
//! Each state owns one screen line, asserted while it is active. Tracking1
//! and VoiceNote capture the session timestamps; VoiceNote and Record close
//! the ledger row.

use super::{Context, InputEvent, StateId};
use crate::ledger::LedgerRecord;
use crate::traits::Board;

/// Behavior of one registered state
pub trait State {
    /// Registry key, also selecting the owned screen line
    fn name(&self) -> StateId;

    /// Transition table of this state
    ///
    /// Every state leaves on every edge; there are no self loops and no
    /// terminal state.
    fn route(&self, event: InputEvent) -> StateId;

    fn enter<B: Board>(&mut self, ctx: &mut Context<B>) {
        ctx.show(self.name());
    }

    fn exit<B: Board>(&mut self, ctx: &mut Context<B>) {
        ctx.hide(self.name());
    }

    /// Handle an input edge, returning the state to switch to
    fn on_input<B: Board>(&mut self, _ctx: &mut Context<B>, event: InputEvent) -> Option<StateId> {
        Some(self.route(event))
    }

    /// Every state this one can transition to, by channel
    fn targets(&self) -> [StateId; 2] {
        [self.route(InputEvent::Channel1Fell), self.route(InputEvent::Channel2Fell)]
    }
}

/// Idle screen, entry point of both profiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Home;

impl State for Home {
    fn name(&self) -> StateId {
        StateId::HOME
    }

    fn route(&self, event: InputEvent) -> StateId {
        match event {
            InputEvent::Channel1Fell => StateId::PROFILE_1,
            InputEvent::Channel2Fell => StateId::PROFILE_2,
        }
    }
}

/// Profile 1 menu: start tracking or start a focus timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Profile1;

impl State for Profile1 {
    fn name(&self) -> StateId {
        StateId::PROFILE_1
    }

    fn route(&self, event: InputEvent) -> StateId {
        match event {
            InputEvent::Channel1Fell => StateId::TRACKING_1,
            InputEvent::Channel2Fell => StateId::FOCUS_TIMER_1,
        }
    }
}

/// Session running; entering opens a new ledger row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tracking1;

impl State for Tracking1 {
    fn name(&self) -> StateId {
        StateId::TRACKING_1
    }

    fn route(&self, _event: InputEvent) -> StateId {
        StateId::VOICE_NOTE
    }

    fn enter<B: Board>(&mut self, ctx: &mut Context<B>) {
        ctx.show(self.name());
        ctx.tracking_mut().clear();
        if let Some(time_in) = ctx.capture() {
            ctx.tracking_mut().begin_session(time_in);
            ctx.record(LedgerRecord::SessionStart(time_in));
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusTimer1;

impl State for FocusTimer1 {
    fn name(&self) -> StateId {
        StateId::FOCUS_TIMER_1
    }

    fn route(&self, _event: InputEvent) -> StateId {
        StateId::HOME
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Profile2;

impl State for Profile2 {
    fn name(&self) -> StateId {
        StateId::PROFILE_2
    }

    fn route(&self, _event: InputEvent) -> StateId {
        StateId::HOME
    }
}

/// Session stopped; asks whether to record a voice note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceNote;

impl State for VoiceNote {
    fn name(&self) -> StateId {
        StateId::VOICE_NOTE
    }

    fn route(&self, event: InputEvent) -> StateId {
        match event {
            InputEvent::Channel1Fell => StateId::RECORD,
            InputEvent::Channel2Fell => StateId::HOME,
        }
    }

    fn enter<B: Board>(&mut self, ctx: &mut Context<B>) {
        ctx.show(self.name());
        if let Some(time_out) = ctx.capture() {
            ctx.tracking_mut().end_session(time_out);
            ctx.record(LedgerRecord::SessionEnd(time_out));
        }
    }

    fn on_input<B: Board>(&mut self, ctx: &mut Context<B>, event: InputEvent) -> Option<StateId> {
        if event == InputEvent::Channel2Fell {
            ctx.record(LedgerRecord::NoVoiceNote);
        }
        Some(self.route(event))
    }
}

/// Voice note capture; leaving closes the ledger row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Record;

impl State for Record {
    fn name(&self) -> StateId {
        StateId::RECORD
    }

    fn route(&self, _event: InputEvent) -> StateId {
        StateId::HOME
    }

    fn exit<B: Board>(&mut self, ctx: &mut Context<B>) {
        ctx.record(LedgerRecord::VoiceNote);
        ctx.hide(self.name());
    }
}

/// Closed set of registrable states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Home(Home),
    Profile1(Profile1),
    Tracking1(Tracking1),
    FocusTimer1(FocusTimer1),
    Profile2(Profile2),
    VoiceNote(VoiceNote),
    Record(Record),
}

macro_rules! each_behavior {
    ($value:expr, $state:ident => $body:expr) => {
        match $value {
            Behavior::Home($state) => $body,
            Behavior::Profile1($state) => $body,
            Behavior::Tracking1($state) => $body,
            Behavior::FocusTimer1($state) => $body,
            Behavior::Profile2($state) => $body,
            Behavior::VoiceNote($state) => $body,
            Behavior::Record($state) => $body,
        }
    };
}

impl Behavior {
    /// All seven states, Home first
    pub const fn standard() -> [Behavior; 7] {
        [
            Behavior::Home(Home),
            Behavior::Profile1(Profile1),
            Behavior::Tracking1(Tracking1),
            Behavior::FocusTimer1(FocusTimer1),
            Behavior::Profile2(Profile2),
            Behavior::VoiceNote(VoiceNote),
            Behavior::Record(Record),
        ]
    }
}

impl State for Behavior {
    fn name(&self) -> StateId {
        each_behavior!(self, s => s.name())
    }

    fn route(&self, event: InputEvent) -> StateId {
        each_behavior!(self, s => s.route(event))
    }

    fn enter<B: Board>(&mut self, ctx: &mut Context<B>) {
        each_behavior!(self, s => s.enter(ctx))
    }

    fn exit<B: Board>(&mut self, ctx: &mut Context<B>) {
        each_behavior!(self, s => s.exit(ctx))
    }

    fn on_input<B: Board>(&mut self, ctx: &mut Context<B>, event: InputEvent) -> Option<StateId> {
        each_behavior!(self, s => s.on_input(ctx, event))
    }
}

macro_rules! behavior_from {
    ($($state:ident),*) => {
        $(
            impl From<$state> for Behavior {
                fn from(state: $state) -> Self {
                    Behavior::$state(state)
                }
            }
        )*
    };
}

behavior_from!(Home, Profile1, Tracking1, FocusTimer1, Profile2, VoiceNote, Record);
