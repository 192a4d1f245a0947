//! Durable storage trait
//!
//! Byte-addressable non-volatile storage (EEPROM or a flash page) that
//! persists the schedule table across power loss. The core addresses
//! it at fixed per-slot offsets; wear is bounded by only writing on
//! explicit setup commits.

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// The underlying write or read failed
    Io,
    /// The requested range is outside the schedule region
    OutOfBounds,
}

/// Trait for byte-addressable durable storage
pub trait ScheduleStorage {
    /// Read `buf.len()` bytes starting at `offset`
    fn read_at(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` starting at `offset`
    fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;
}
