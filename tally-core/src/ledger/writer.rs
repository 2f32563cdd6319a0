//! Ledger writer
//!
//! Renders a [`LedgerRecord`] into a fixed line buffer and hands it to the
//! sink as a single append, with the activity indicator held high for the
//! duration of the write.

use core::fmt::{self, Write as _};

use heapless::String;
use tally_hal::OutputPin;

use super::record::{LedgerRecord, EMPTY_CELL, HEADER_LINE, ROW_CELLS, ROW_END};
use crate::traits::{LedgerError, LedgerSink};

/// Longest rendered record, in bytes
pub const LINE_CAPACITY: usize = 64;

/// Append-only ledger over a [`LedgerSink`]
pub struct Ledger<K, I> {
    sink: K,
    indicator: I,
    /// Column the file currently ends at
    column: u8,
    appends: u32,
    failed_appends: u32,
}

impl<K: LedgerSink, I: OutputPin> Ledger<K, I> {
    /// Wrap a sink and its activity indicator; the indicator starts low
    pub fn new(sink: K, mut indicator: I) -> Self {
        indicator.set_low();
        Self {
            sink,
            indicator,
            column: 0,
            appends: 0,
            failed_appends: 0,
        }
    }

    /// Prepare the ledger at startup
    ///
    /// Picks up the column an interrupted session left the file at, then
    /// writes the header row unless the ledger already begins with it.
    /// Existing content is never truncated. Returns whether the header was
    /// written.
    pub fn init(&mut self) -> Result<bool, LedgerError> {
        let mut tail = [0u8; LINE_CAPACITY];
        let n = self.sink.read_tail(&mut tail)?;
        self.column = open_column(&tail[..n]);

        let mut head = [0u8; HEADER_LINE.len()];
        let n = self.sink.read_head(&mut head)?;
        if head[..n] == *HEADER_LINE.as_bytes() {
            return Ok(false);
        }
        self.append(&LedgerRecord::Header)?;
        Ok(true)
    }

    /// Append one record
    ///
    /// Missing cells before the record are written empty; a row still open
    /// when a record for a new row arrives is terminated first. The
    /// indicator is driven low again whether or not the write succeeded.
    pub fn append(&mut self, record: &LedgerRecord) -> Result<(), LedgerError> {
        let mut line: String<LINE_CAPACITY> = String::new();
        render(&mut line, self.column, record).map_err(|_| LedgerError::RecordTooLong)?;

        self.indicator.set_high();
        let result = self.sink.append(line.as_bytes());
        self.indicator.set_low();

        match result {
            Ok(()) => {
                self.column = record.next_column();
                self.appends = self.appends.wrapping_add(1);
            }
            Err(_) => self.failed_appends = self.failed_appends.wrapping_add(1),
        }
        result
    }

    /// Successful appends since startup
    pub fn appends(&self) -> u32 {
        self.appends
    }

    /// Failed appends since startup
    pub fn failed_appends(&self) -> u32 {
        self.failed_appends
    }

    /// Indicator pin, for fault blink patterns between writes
    pub fn indicator_mut(&mut self) -> &mut I {
        &mut self.indicator
    }
}

/// Write `record` into `out`, padding from `column` to where it belongs
fn render(out: &mut impl fmt::Write, column: u8, record: &LedgerRecord) -> fmt::Result {
    let target = record.first_column();
    let mut column = column;
    if column > target {
        for _ in column..ROW_CELLS - 1 {
            out.write_str(EMPTY_CELL)?;
        }
        out.write_str(ROW_END)?;
        column = 0;
    }
    for _ in column..target {
        out.write_str(EMPTY_CELL)?;
    }
    write!(out, "{}", record)
}

/// Number of cells already written on the unterminated last row of `tail`
fn open_column(tail: &[u8]) -> u8 {
    let row = match tail.windows(2).rposition(|w| w == ROW_END.as_bytes()) {
        Some(i) => &tail[i + 2..],
        None => tail,
    };
    let cells = row.windows(2).filter(|w| *w == EMPTY_CELL.as_bytes()).count();
    cells.min(ROW_CELLS as usize - 1) as u8
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::tracking::TimeStamp;
    use core::cell::RefCell;
    use std::format;
    use std::string::String as StdString;
    use std::vec::Vec;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        IndicatorHigh,
        IndicatorLow,
        Write(StdString),
    }

    struct MockSink<'a> {
        log: &'a RefCell<Vec<Op>>,
        contents: Vec<u8>,
        fail: bool,
    }

    impl<'a> MockSink<'a> {
        fn new(log: &'a RefCell<Vec<Op>>) -> Self {
            Self {
                log,
                contents: Vec::new(),
                fail: false,
            }
        }
    }

    impl LedgerSink for MockSink<'_> {
        fn append(&mut self, bytes: &[u8]) -> Result<(), LedgerError> {
            if self.fail {
                return Err(LedgerError::Device);
            }
            self.contents.extend_from_slice(bytes);
            let text = StdString::from_utf8(bytes.to_vec()).unwrap();
            self.log.borrow_mut().push(Op::Write(text));
            Ok(())
        }

        fn read_head(&mut self, buf: &mut [u8]) -> Result<usize, LedgerError> {
            let n = buf.len().min(self.contents.len());
            buf[..n].copy_from_slice(&self.contents[..n]);
            Ok(n)
        }

        fn read_tail(&mut self, buf: &mut [u8]) -> Result<usize, LedgerError> {
            let n = buf.len().min(self.contents.len());
            buf[..n].copy_from_slice(&self.contents[self.contents.len() - n..]);
            Ok(n)
        }
    }

    struct MockIndicator<'a> {
        log: &'a RefCell<Vec<Op>>,
        high: bool,
    }

    impl OutputPin for MockIndicator<'_> {
        fn set_high(&mut self) {
            self.high = true;
            self.log.borrow_mut().push(Op::IndicatorHigh);
        }

        fn set_low(&mut self) {
            self.high = false;
            self.log.borrow_mut().push(Op::IndicatorLow);
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    fn ledger(log: &RefCell<Vec<Op>>) -> Ledger<MockSink<'_>, MockIndicator<'_>> {
        let ledger = Ledger::new(MockSink::new(log), MockIndicator { log, high: true });
        log.borrow_mut().clear();
        ledger
    }

    #[test]
    fn test_new_drives_indicator_low() {
        let log = RefCell::new(Vec::new());
        let ledger = Ledger::new(MockSink::new(&log), MockIndicator { log: &log, high: true });
        assert!(!ledger.indicator.high);
    }

    #[test]
    fn test_append_brackets_write_with_indicator() {
        let log = RefCell::new(Vec::new());
        let mut ledger = ledger(&log);
        let t = TimeStamp::new(2024, 3, 1, 9, 15, 30).unwrap();

        ledger.append(&LedgerRecord::SessionStart(t)).unwrap();

        assert_eq!(
            *log.borrow(),
            [
                Op::IndicatorHigh,
                Op::Write("3/1/2024, 9:15:30, ".into()),
                Op::IndicatorLow,
            ]
        );
        assert_eq!(ledger.appends(), 1);
    }

    #[test]
    fn test_failed_append_releases_indicator() {
        let log = RefCell::new(Vec::new());
        let mut ledger = ledger(&log);
        ledger.sink.fail = true;

        assert_eq!(ledger.append(&LedgerRecord::VoiceNote), Err(LedgerError::Device));
        assert!(!ledger.indicator.high);
        assert_eq!(*log.borrow(), [Op::IndicatorHigh, Op::IndicatorLow]);
        assert_eq!(ledger.failed_appends(), 1);
        assert_eq!(ledger.appends(), 0);
    }

    #[test]
    fn test_init_writes_header_to_empty_ledger() {
        let log = RefCell::new(Vec::new());
        let mut ledger = ledger(&log);

        assert_eq!(ledger.init(), Ok(true));
        assert_eq!(ledger.sink.contents, HEADER_LINE.as_bytes());
    }

    #[test]
    fn test_init_keeps_existing_ledger() {
        let log = RefCell::new(Vec::new());
        let mut ledger = ledger(&log);
        ledger.sink.contents.extend_from_slice(HEADER_LINE.as_bytes());
        ledger.sink.contents.extend_from_slice(b"3/1/2024, 9:15:30, ");

        assert_eq!(ledger.init(), Ok(false));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_init_propagates_read_failure() {
        struct Broken;
        impl LedgerSink for Broken {
            fn append(&mut self, _: &[u8]) -> Result<(), LedgerError> {
                Err(LedgerError::Device)
            }
            fn read_head(&mut self, _: &mut [u8]) -> Result<usize, LedgerError> {
                Err(LedgerError::Filesystem)
            }
            fn read_tail(&mut self, _: &mut [u8]) -> Result<usize, LedgerError> {
                Err(LedgerError::Filesystem)
            }
        }

        let log = RefCell::new(Vec::new());
        let mut ledger = Ledger::new(Broken, MockIndicator { log: &log, high: false });
        assert_eq!(ledger.init(), Err(LedgerError::Filesystem));
    }

    fn contents(ledger: &Ledger<MockSink<'_>, MockIndicator<'_>>) -> StdString {
        StdString::from_utf8(ledger.sink.contents.clone()).unwrap()
    }

    fn ts(h: u8, m: u8, s: u8) -> TimeStamp {
        TimeStamp::new(2024, 3, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_missing_start_is_padded() {
        let log = RefCell::new(Vec::new());
        let mut ledger = ledger(&log);

        ledger.append(&LedgerRecord::SessionEnd(ts(10, 0, 5))).unwrap();
        ledger.append(&LedgerRecord::VoiceNote).unwrap();

        assert_eq!(contents(&ledger), ", , 10:00:05, Delta Formula, Speech to text voice note\r\n");
    }

    #[test]
    fn test_missing_time_out_is_padded() {
        let log = RefCell::new(Vec::new());
        let mut ledger = ledger(&log);

        ledger.append(&LedgerRecord::SessionStart(ts(9, 15, 30))).unwrap();
        ledger.append(&LedgerRecord::NoVoiceNote).unwrap();

        assert_eq!(contents(&ledger), "3/1/2024, 9:15:30, , Delta Formula, \r\n");
    }

    #[test]
    fn test_failed_append_does_not_advance_column() {
        let log = RefCell::new(Vec::new());
        let mut ledger = ledger(&log);

        ledger.sink.fail = true;
        assert!(ledger.append(&LedgerRecord::SessionStart(ts(9, 15, 30))).is_err());
        assert_eq!(ledger.column, 0);

        ledger.sink.fail = false;
        ledger.append(&LedgerRecord::SessionEnd(ts(10, 0, 5))).unwrap();
        assert_eq!(contents(&ledger), ", , 10:00:05, ");
        assert_eq!(ledger.column, 3);
    }

    #[test]
    fn test_open_row_is_closed_before_next_session() {
        let log = RefCell::new(Vec::new());
        let mut ledger = ledger(&log);

        ledger.append(&LedgerRecord::SessionStart(ts(9, 15, 30))).unwrap();
        ledger.append(&LedgerRecord::SessionEnd(ts(10, 0, 5))).unwrap();
        ledger.append(&LedgerRecord::SessionStart(ts(11, 0, 0))).unwrap();

        assert_eq!(
            contents(&ledger),
            "3/1/2024, 9:15:30, 10:00:05, , \r\n3/1/2024, 11:00:00, "
        );
        assert_eq!(ledger.column, 2);
    }

    #[test]
    fn test_init_resumes_interrupted_row() {
        let log = RefCell::new(Vec::new());
        let mut ledger = ledger(&log);
        ledger.sink.contents.extend_from_slice(HEADER_LINE.as_bytes());
        ledger.sink.contents.extend_from_slice(b"3/1/2024, 9:15:30, ");

        assert_eq!(ledger.init(), Ok(false));
        assert_eq!(ledger.column, 2);

        ledger.append(&LedgerRecord::SessionStart(ts(11, 0, 0))).unwrap();
        let text = contents(&ledger);
        let rows: Vec<&str> = text.split_inclusive("\r\n").collect();
        assert_eq!(rows[1], "3/1/2024, 9:15:30, , , \r\n");
        assert_eq!(rows[2], "3/1/2024, 11:00:00, ");
    }

    #[test]
    fn test_header_closes_foreign_open_row() {
        let log = RefCell::new(Vec::new());
        let mut ledger = ledger(&log);
        ledger.sink.contents.extend_from_slice(b"notes, ");

        assert_eq!(ledger.init(), Ok(true));
        assert_eq!(contents(&ledger), format!("notes, , , , \r\n{}", HEADER_LINE));
        assert_eq!(ledger.column, 0);
    }

    #[test]
    fn test_open_column() {
        assert_eq!(open_column(b""), 0);
        assert_eq!(open_column(HEADER_LINE.as_bytes()), 0);
        assert_eq!(open_column(b"Delta Formula, \r\n3/1/2024, 9:15:30, "), 2);
        assert_eq!(open_column(b"3/1/2024, 9:15:30, 10:00:05, "), 3);
        assert_eq!(open_column(b", , , , , , , "), ROW_CELLS - 1);
    }
}
