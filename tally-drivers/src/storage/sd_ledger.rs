//! Ledger file on a FAT-formatted SD card
//!
//! The ledger lives in the root directory of the first partition. Every
//! operation mounts the volume, opens the file, performs the access and
//! closes everything again, so pulling the card between writes never leaves
//! an open handle behind.

use embedded_sdmmc::{BlockDevice, Mode, TimeSource, Timestamp, VolumeIdx, VolumeManager};
use tally_core::tracking::TimeStamp;
use tally_core::traits::{LedgerError, LedgerSink};

/// Constant timestamp used for directory entries
///
/// The RTC sits on its own bus owned by the state machine, so file
/// modification times come from a fixed value (the configured clock seed
/// when there is one).
#[derive(Clone, Copy, Debug)]
pub struct FixedTimeSource(Timestamp);

impl FixedTimeSource {
    pub fn new(at: TimeStamp) -> Self {
        Self(Timestamp {
            year_since_1970: at.year().saturating_sub(1970).min(u8::MAX as u16) as u8,
            zero_indexed_month: at.month() - 1,
            zero_indexed_day: at.day() - 1,
            hours: at.hour(),
            minutes: at.minute(),
            seconds: at.second(),
        })
    }
}

impl Default for FixedTimeSource {
    fn default() -> Self {
        // 2024-01-01 00:00:00
        Self(Timestamp {
            year_since_1970: 54,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        })
    }
}

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        self.0
    }
}

/// Append-only ledger file on an SD card
pub struct SdLedger<D: BlockDevice, T: TimeSource> {
    volumes: VolumeManager<D, T>,
    file_name: &'static str,
}

impl<D: BlockDevice, T: TimeSource> SdLedger<D, T> {
    /// `file_name` must be an 8.3 short name in the root directory
    pub fn new(device: D, time_source: T, file_name: &'static str) -> Self {
        Self {
            volumes: VolumeManager::new(device, time_source),
            file_name,
        }
    }

    /// Check that the card is present and carries a FAT volume
    pub fn mount(&mut self) -> Result<(), LedgerError> {
        let mut volume = self.volumes.open_volume(VolumeIdx(0)).map_err(map_error)?;
        let mut root = volume.open_root_dir().map_err(map_error)?;
        root.close().map_err(map_error)?;
        volume.close().map_err(map_error)
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}

impl<D: BlockDevice, T: TimeSource> LedgerSink for SdLedger<D, T> {
    fn append(&mut self, bytes: &[u8]) -> Result<(), LedgerError> {
        let mut volume = self.volumes.open_volume(VolumeIdx(0)).map_err(map_error)?;
        let mut root = volume.open_root_dir().map_err(map_error)?;
        let mut file = root
            .open_file_in_dir(self.file_name, Mode::ReadWriteCreateOrAppend)
            .map_err(map_error)?;

        file.write(bytes).map_err(map_error)?;

        file.close().map_err(map_error)?;
        root.close().map_err(map_error)?;
        volume.close().map_err(map_error)
    }

    fn read_head(&mut self, buf: &mut [u8]) -> Result<usize, LedgerError> {
        self.read(buf, End::Head)
    }

    fn read_tail(&mut self, buf: &mut [u8]) -> Result<usize, LedgerError> {
        self.read(buf, End::Tail)
    }
}

/// Which end of the file a read starts from
#[derive(Clone, Copy, PartialEq, Eq)]
enum End {
    Head,
    Tail,
}

impl<D: BlockDevice, T: TimeSource> SdLedger<D, T> {
    /// Fill `buf` from one end of the ledger; a missing file reads as empty
    fn read(&mut self, buf: &mut [u8], end: End) -> Result<usize, LedgerError> {
        let mut volume = self.volumes.open_volume(VolumeIdx(0)).map_err(map_error)?;
        let mut root = volume.open_root_dir().map_err(map_error)?;
        let mut file = match root.open_file_in_dir(self.file_name, Mode::ReadOnly) {
            Ok(file) => file,
            Err(embedded_sdmmc::Error::NotFound) => return Ok(0),
            Err(e) => return Err(map_error(e)),
        };

        let want = match end {
            End::Head => buf.len(),
            End::Tail => {
                let n = file.length().min(u32::try_from(buf.len()).unwrap_or(u32::MAX));
                file.seek_from_end(n).map_err(map_error)?;
                n as usize
            }
        };

        let mut filled = 0;
        while filled < want && !file.is_eof() {
            let n = file.read(&mut buf[filled..want]).map_err(map_error)?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        file.close().map_err(map_error)?;
        root.close().map_err(map_error)?;
        volume.close().map_err(map_error)?;
        Ok(filled)
    }
}

fn map_error<E: core::fmt::Debug>(e: embedded_sdmmc::Error<E>) -> LedgerError {
    match e {
        embedded_sdmmc::Error::DeviceError(_) => LedgerError::Device,
        embedded_sdmmc::Error::DiskFull => LedgerError::Full,
        _ => LedgerError::Filesystem,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::cell::{Cell, RefCell};
    use embedded_sdmmc::{Block, BlockCount, BlockIdx, Error};
    use std::collections::HashMap;
    use std::rc::Rc;
    use tally_core::ledger::{Ledger, LedgerRecord, HEADER_LINE};
    use tally_hal::OutputPin;

    const FILE: &str = "TALLY.CSV";
    const PARTITION_START: u32 = 1;
    const VOLUME_BLOCKS: u32 = 8192;
    const FAT_BLOCKS: u16 = 32;

    #[derive(Debug)]
    struct DiskError;

    /// Sparse in-memory card; unwritten blocks read as zeroes
    #[derive(Clone, Default)]
    struct RamCard {
        blocks: Rc<RefCell<HashMap<u32, [u8; Block::LEN]>>>,
        broken: Rc<Cell<bool>>,
    }

    impl RamCard {
        fn put(&self, idx: u32, contents: [u8; Block::LEN]) {
            self.blocks.borrow_mut().insert(idx, contents);
        }

        /// MBR with a single FAT16 partition, one block per cluster
        fn formatted() -> Self {
            let card = Self::default();

            let mut mbr = [0u8; Block::LEN];
            let entry = &mut mbr[0x1BE..0x1CE];
            entry[4] = 0x06;
            entry[8..12].copy_from_slice(&PARTITION_START.to_le_bytes());
            entry[12..16].copy_from_slice(&VOLUME_BLOCKS.to_le_bytes());
            mbr[510] = 0x55;
            mbr[511] = 0xAA;
            card.put(0, mbr);

            let mut boot = [0u8; Block::LEN];
            boot[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
            boot[3..11].copy_from_slice(b"MSWIN4.1");
            boot[11..13].copy_from_slice(&512u16.to_le_bytes());
            boot[13] = 1;
            boot[14..16].copy_from_slice(&1u16.to_le_bytes());
            boot[16] = 2;
            boot[17..19].copy_from_slice(&512u16.to_le_bytes());
            boot[19..21].copy_from_slice(&(VOLUME_BLOCKS as u16).to_le_bytes());
            boot[21] = 0xF8;
            boot[22..24].copy_from_slice(&FAT_BLOCKS.to_le_bytes());
            boot[24..26].copy_from_slice(&32u16.to_le_bytes());
            boot[26..28].copy_from_slice(&2u16.to_le_bytes());
            boot[28..32].copy_from_slice(&PARTITION_START.to_le_bytes());
            boot[36] = 0x80;
            boot[38] = 0x29;
            boot[39..43].copy_from_slice(&0x7A11_7A11u32.to_le_bytes());
            boot[43..54].copy_from_slice(b"TALLY      ");
            boot[54..62].copy_from_slice(b"FAT16   ");
            boot[510] = 0x55;
            boot[511] = 0xAA;
            card.put(PARTITION_START, boot);

            // Media descriptor and end-of-chain marker in both FAT copies
            let mut fat = [0u8; Block::LEN];
            fat[0..4].copy_from_slice(&[0xF8, 0xFF, 0xFF, 0xFF]);
            card.put(PARTITION_START + 1, fat);
            card.put(PARTITION_START + 1 + u32::from(FAT_BLOCKS), fat);

            card
        }

        fn break_now(&self) {
            self.broken.set(true);
        }
    }

    impl BlockDevice for RamCard {
        type Error = DiskError;

        fn read(&self, blocks: &mut [Block], start_block_idx: BlockIdx, _reason: &str) -> Result<(), Self::Error> {
            if self.broken.get() {
                return Err(DiskError);
            }
            let stored = self.blocks.borrow();
            for (i, block) in blocks.iter_mut().enumerate() {
                let idx = start_block_idx.0 + i as u32;
                block.contents = stored.get(&idx).copied().unwrap_or([0; Block::LEN]);
            }
            Ok(())
        }

        fn write(&self, blocks: &[Block], start_block_idx: BlockIdx) -> Result<(), Self::Error> {
            if self.broken.get() {
                return Err(DiskError);
            }
            for (i, block) in blocks.iter().enumerate() {
                self.put(start_block_idx.0 + i as u32, block.contents);
            }
            Ok(())
        }

        fn num_blocks(&self) -> Result<BlockCount, Self::Error> {
            Ok(BlockCount(PARTITION_START + VOLUME_BLOCKS))
        }
    }

    struct Led;

    impl OutputPin for Led {
        fn set_high(&mut self) {}
        fn set_low(&mut self) {}
        fn is_set_high(&self) -> bool {
            false
        }
    }

    fn sd(card: &RamCard) -> SdLedger<RamCard, FixedTimeSource> {
        SdLedger::new(card.clone(), FixedTimeSource::default(), FILE)
    }

    fn contents(card: &RamCard) -> std::string::String {
        let mut buf = [0u8; 256];
        let n = sd(card).read_head(&mut buf).unwrap();
        std::string::String::from_utf8(buf[..n].to_vec()).unwrap()
    }

    fn ts(hour: u8, minute: u8, second: u8) -> TimeStamp {
        TimeStamp::new(2024, 3, 1, hour, minute, second).unwrap()
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(map_error(Error::DeviceError(())), LedgerError::Device);
        assert_eq!(map_error(Error::<()>::DiskFull), LedgerError::Full);
        assert_eq!(map_error(Error::<()>::NotFound), LedgerError::Filesystem);
        assert_eq!(map_error(Error::<()>::FormatError("bad BPB")), LedgerError::Filesystem);
    }

    #[test]
    fn test_time_source_from_stamp() {
        let at = TimeStamp::new(2024, 3, 1, 9, 15, 30).unwrap();
        let ts = FixedTimeSource::new(at).get_timestamp();

        assert_eq!(ts.year_since_1970, 54);
        assert_eq!(ts.zero_indexed_month, 2);
        assert_eq!(ts.zero_indexed_day, 0);
        assert_eq!((ts.hours, ts.minutes, ts.seconds), (9, 15, 30));
    }

    #[test]
    fn test_default_time_source() {
        let ts = FixedTimeSource::default().get_timestamp();
        assert_eq!(ts.year_since_1970, 54);
        assert_eq!(ts.zero_indexed_month, 0);
    }

    #[test]
    fn test_mount_formatted_card() {
        let card = RamCard::formatted();
        assert_eq!(sd(&card).mount(), Ok(()));
    }

    #[test]
    fn test_mount_blank_card() {
        let card = RamCard::default();
        assert_eq!(sd(&card).mount(), Err(LedgerError::Filesystem));
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let card = RamCard::formatted();
        let mut ledger = sd(&card);
        let mut buf = [0u8; 16];

        assert_eq!(ledger.read_head(&mut buf), Ok(0));
        assert_eq!(ledger.read_tail(&mut buf), Ok(0));
    }

    #[test]
    fn test_appends_extend_the_file() {
        let card = RamCard::formatted();
        let mut ledger = sd(&card);

        ledger.append(b"3/1/2024, 9:15:30, ").unwrap();
        ledger.append(b"10:00:05, ").unwrap();

        assert_eq!(contents(&card), "3/1/2024, 9:15:30, 10:00:05, ");
    }

    #[test]
    fn test_read_head_stops_at_buffer() {
        let card = RamCard::formatted();
        let mut ledger = sd(&card);
        ledger.append(b"abcdef").unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(ledger.read_head(&mut buf), Ok(4));
        assert_eq!(&buf, b"abcd");
    }

    #[test]
    fn test_read_tail_returns_last_bytes() {
        let card = RamCard::formatted();
        let mut ledger = sd(&card);
        ledger.append(b"abc").unwrap();
        ledger.append(b"def").unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(ledger.read_tail(&mut buf), Ok(4));
        assert_eq!(&buf, b"cdef");

        let mut wide = [0u8; 32];
        assert_eq!(ledger.read_tail(&mut wide), Ok(6));
        assert_eq!(&wide[..6], b"abcdef");
    }

    #[test]
    fn test_file_survives_remount() {
        let card = RamCard::formatted();
        sd(&card).append(b"first\r\n").unwrap();
        sd(&card).append(b"second\r\n").unwrap();

        assert_eq!(contents(&card), "first\r\nsecond\r\n");
    }

    #[test]
    fn test_device_error_on_append() {
        let card = RamCard::formatted();
        let mut ledger = sd(&card);
        card.break_now();

        assert_eq!(ledger.append(b"lost"), Err(LedgerError::Device));
        let mut buf = [0u8; 4];
        assert_eq!(ledger.read_head(&mut buf), Err(LedgerError::Device));
    }

    #[test]
    fn test_ledger_writes_header_once() {
        let card = RamCard::formatted();

        let mut ledger = Ledger::new(sd(&card), Led);
        assert_eq!(ledger.init(), Ok(true));
        let mut ledger = Ledger::new(sd(&card), Led);
        assert_eq!(ledger.init(), Ok(false));

        assert_eq!(contents(&card), HEADER_LINE);
    }

    #[test]
    fn test_session_interrupted_by_reboot() {
        let card = RamCard::formatted();

        let mut ledger = Ledger::new(sd(&card), Led);
        ledger.init().unwrap();
        ledger.append(&LedgerRecord::SessionStart(ts(9, 15, 30))).unwrap();
        drop(ledger);

        let mut ledger = Ledger::new(sd(&card), Led);
        assert_eq!(ledger.init(), Ok(false));
        ledger.append(&LedgerRecord::SessionStart(ts(11, 0, 0))).unwrap();
        ledger.append(&LedgerRecord::SessionEnd(ts(11, 30, 0))).unwrap();
        ledger.append(&LedgerRecord::NoVoiceNote).unwrap();

        let expected = std::format!(
            "{}3/1/2024, 9:15:30, , , \r\n3/1/2024, 11:00:00, 11:30:00, Delta Formula, \r\n",
            HEADER_LINE
        );
        assert_eq!(contents(&card), expected);
    }
}
