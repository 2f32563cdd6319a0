//! Fake board for unit tests

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use tally_hal::OutputPin;

use super::{Context, StateId};
use crate::ledger::Ledger;
use crate::tracking::TimeStamp;
use crate::traits::{Board, ClockError, ClockSource, LedgerError, LedgerSink, ScreenLines};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trace {
    Show(StateId),
    Hide(StateId),
    Write(String),
}

/// Shared handles into the fakes, kept by the test after the context moves
#[derive(Clone, Default)]
pub struct Recorder {
    trace: Rc<RefCell<Vec<Trace>>>,
    clock: Rc<RefCell<VecDeque<Result<TimeStamp, ClockError>>>>,
    fail_writes: Rc<Cell<bool>>,
    indicator_high: Rc<Cell<bool>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<Trace> {
        self.trace.borrow_mut().drain(..).collect()
    }

    pub fn writes(&self) -> Vec<String> {
        self.trace
            .borrow()
            .iter()
            .filter_map(|t| match t {
                Trace::Write(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn queue_clock(&self, reading: Result<TimeStamp, ClockError>) {
        self.clock.borrow_mut().push_back(reading);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn indicator_high(&self) -> bool {
        self.indicator_high.get()
    }
}

pub struct FakeScreens {
    trace: Rc<RefCell<Vec<Trace>>>,
    lines: [(StateId, bool); 7],
}

impl ScreenLines for FakeScreens {
    fn set_line(&mut self, screen: StateId, asserted: bool) {
        if let Some(line) = self.lines.iter_mut().find(|(id, _)| *id == screen) {
            line.1 = asserted;
        }
        let t = if asserted { Trace::Show(screen) } else { Trace::Hide(screen) };
        self.trace.borrow_mut().push(t);
    }

    fn is_asserted(&self, screen: StateId) -> bool {
        self.lines.iter().any(|(id, on)| *id == screen && *on)
    }
}

/// Replays queued readings, then a fixed 2024-03-01 09:15:30
pub struct FakeClock {
    readings: Rc<RefCell<VecDeque<Result<TimeStamp, ClockError>>>>,
}

impl ClockSource for FakeClock {
    fn now(&mut self) -> Result<TimeStamp, ClockError> {
        match self.readings.borrow_mut().pop_front() {
            Some(reading) => reading,
            None => Ok(TimeStamp::new(2024, 3, 1, 9, 15, 30).unwrap()),
        }
    }
}

pub struct FakeSink {
    trace: Rc<RefCell<Vec<Trace>>>,
    fail: Rc<Cell<bool>>,
}

impl LedgerSink for FakeSink {
    fn append(&mut self, bytes: &[u8]) -> Result<(), LedgerError> {
        if self.fail.get() {
            return Err(LedgerError::Device);
        }
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        self.trace.borrow_mut().push(Trace::Write(text));
        Ok(())
    }

    fn read_head(&mut self, _buf: &mut [u8]) -> Result<usize, LedgerError> {
        Ok(0)
    }

    fn read_tail(&mut self, _buf: &mut [u8]) -> Result<usize, LedgerError> {
        Ok(0)
    }
}

pub struct FakeIndicator {
    high: Rc<Cell<bool>>,
}

impl OutputPin for FakeIndicator {
    fn set_high(&mut self) {
        self.high.set(true);
    }

    fn set_low(&mut self) {
        self.high.set(false);
    }

    fn is_set_high(&self) -> bool {
        self.high.get()
    }
}

pub struct FakeBoard;

impl Board for FakeBoard {
    type Screens = FakeScreens;
    type Clock = FakeClock;
    type Sink = FakeSink;
    type Indicator = FakeIndicator;
}

pub fn context(rec: &Recorder) -> Context<FakeBoard> {
    let screens = FakeScreens {
        trace: rec.trace.clone(),
        lines: StateId::STANDARD.map(|id| (id, false)),
    };
    let clock = FakeClock {
        readings: rec.clock.clone(),
    };
    let sink = FakeSink {
        trace: rec.trace.clone(),
        fail: rec.fail_writes.clone(),
    };
    let indicator = FakeIndicator {
        high: rec.indicator_high.clone(),
    };
    Context::new(screens, clock, Ledger::new(sink, indicator))
}
