//! Ledger storage trait

/// Errors from the ledger storage device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedgerError {
    /// Card missing or the block device reported an error
    Device,
    /// Filesystem could not open or update the ledger file
    Filesystem,
    /// No space left on the card
    Full,
    /// Rendered record did not fit the line buffer
    RecordTooLong,
}

/// Append-only byte sink backing the ledger file
///
/// Every call is self-contained: implementations open the ledger, perform
/// the operation and close it again before returning. No handle is held
/// between calls.
pub trait LedgerSink {
    /// Append `bytes` at the end of the ledger, creating it if missing
    fn append(&mut self, bytes: &[u8]) -> Result<(), LedgerError>;

    /// Read the first bytes of the ledger into `buf`
    ///
    /// Returns the number of bytes read; a missing ledger reads as empty.
    fn read_head(&mut self, buf: &mut [u8]) -> Result<usize, LedgerError>;

    /// Read the last bytes of the ledger into `buf`
    ///
    /// Reads `min(buf.len(), length)` bytes ending at the end of the file
    /// and returns that count; a missing ledger reads as empty.
    fn read_tail(&mut self, buf: &mut [u8]) -> Result<usize, LedgerError>;
}
