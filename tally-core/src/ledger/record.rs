//! Ledger records and their text rendering

use core::fmt;

use crate::tracking::TimeStamp;

/// Header row written at the top of a fresh ledger
pub const HEADER_LINE: &str = "Date, Time In, Time Out , Total, Voice Note\r\n";

/// Cells in a complete row: date, time in, time out, total, voice note
pub const ROW_CELLS: u8 = 5;

/// Cell left blank because its value was never captured or never written
pub(super) const EMPTY_CELL: &str = ", ";

/// Row terminator
pub(super) const ROW_END: &str = "\r\n";

/// Placeholder left in the Total column for the spreadsheet to fill in
const TOTAL_PLACEHOLDER: &str = "Delta Formula";

/// Voice Note column value for a session that took a note
const VOICE_NOTE_CELL: &str = "Speech to text voice note";

/// One append to the ledger
///
/// Creating a record and persisting it are the same event: records are
/// rendered and handed to the writer immediately, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedgerRecord {
    /// Column header row
    Header,
    /// Date and time-in cells opening a session row
    SessionStart(TimeStamp),
    /// Time-out cell continuing the open row
    SessionEnd(TimeStamp),
    /// Total placeholder and voice note marker, closing the row
    VoiceNote,
    /// Total placeholder and an empty voice note cell, closing the row
    NoVoiceNote,
}

impl LedgerRecord {
    /// Column of the first cell this record writes
    pub const fn first_column(&self) -> u8 {
        match self {
            Self::Header | Self::SessionStart(_) => 0,
            Self::SessionEnd(_) => 2,
            Self::VoiceNote | Self::NoVoiceNote => 3,
        }
    }

    /// Column the next record continues at, 0 once the row is terminated
    pub const fn next_column(&self) -> u8 {
        match self {
            Self::Header | Self::VoiceNote | Self::NoVoiceNote => 0,
            Self::SessionStart(_) => 2,
            Self::SessionEnd(_) => 3,
        }
    }
}

impl fmt::Display for LedgerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str(HEADER_LINE),
            Self::SessionStart(t) => write!(f, "{}, {}, ", t.date(), t.time_of_day()),
            Self::SessionEnd(t) => write!(f, "{}, ", t.time_of_day()),
            Self::VoiceNote => write!(f, "{}, {}{}", TOTAL_PLACEHOLDER, VOICE_NOTE_CELL, ROW_END),
            Self::NoVoiceNote => write!(f, "{}, {}", TOTAL_PLACEHOLDER, ROW_END),
        }
    }
}
