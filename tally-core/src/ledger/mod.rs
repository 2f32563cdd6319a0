//! Time-tracking ledger
//!
//! Flat comma-delimited text with CRLF row ends. A session row is built from
//! several appends: the date and time-in when tracking starts, the time-out
//! when it stops, and a closing pair of cells once the voice note prompt is
//! answered.
//!
//! The writer tracks the column the file currently ends at. A record whose
//! predecessor was lost to a clock or card failure is padded with empty
//! cells, and a row left open is terminated before the next one starts, so
//! every row keeps its five columns.

pub mod record;
pub mod writer;

pub use record::{LedgerRecord, HEADER_LINE, ROW_CELLS};
pub use writer::{Ledger, LINE_CAPACITY};
