//! Schedule persistence in on-chip flash
//!
//! The schedule table lives in the last erase sector of flash, far
//! away from the firmware image. Writes are rare (one per setup
//! commit) so a plain read-erase-program cycle is fine; no wear
//! leveling.

use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;

use remedi_core::traits::{ScheduleStorage, StorageError};

/// Total flash size on the target board (2MB)
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Schedule partition: the last erase sector
pub const PARTITION_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Usable bytes within the partition; one flash page
const PARTITION_LEN: usize = 256;

pub struct FlashScheduleStorage {
    flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>,
}

impl FlashScheduleStorage {
    pub fn new(flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>) -> Self {
        Self { flash }
    }

    fn check_bounds(offset: usize, len: usize) -> Result<(), StorageError> {
        if offset.checked_add(len).map_or(true, |end| end > PARTITION_LEN) {
            return Err(StorageError::OutOfBounds);
        }
        Ok(())
    }
}

impl ScheduleStorage for FlashScheduleStorage {
    fn read_at(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        Self::check_bounds(offset, buf.len())?;
        self.flash
            .blocking_read(PARTITION_OFFSET + offset as u32, buf)
            .map_err(|_| StorageError::Io)
    }

    fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        Self::check_bounds(offset, data.len())?;

        // Read-modify-write of the whole page: flash bits only clear
        // on program, so the sector is erased first.
        let mut page = [0u8; PARTITION_LEN];
        self.flash
            .blocking_read(PARTITION_OFFSET, &mut page)
            .map_err(|_| StorageError::Io)?;

        page[offset..offset + data.len()].copy_from_slice(data);

        self.flash
            .blocking_erase(PARTITION_OFFSET, PARTITION_OFFSET + ERASE_SIZE as u32)
            .map_err(|_| StorageError::Io)?;
        self.flash
            .blocking_write(PARTITION_OFFSET, &page)
            .map_err(|_| StorageError::Io)
    }
}
