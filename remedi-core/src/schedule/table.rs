//! Fixed five-slot schedule table

use super::entry::{DoseEntry, ENTRY_BYTES};
use crate::traits::{ScheduleStorage, StorageError};

/// Number of dose slots
pub const SLOT_COUNT: usize = 5;

/// The in-memory schedule: exactly five slots, indexed 0-4
///
/// Owned exclusively by the firmware; slots are reused and
/// deactivated, never removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleTable {
    entries: [DoseEntry; SLOT_COUNT],
}

impl ScheduleTable {
    /// Create a table of deactivated default entries
    pub const fn new() -> Self {
        Self {
            entries: [DoseEntry {
                active: false,
                hour: 0,
                minute: 0,
                dispensed_today: false,
            }; SLOT_COUNT],
        }
    }

    /// Storage offset of a slot's record
    pub const fn slot_offset(index: usize) -> usize {
        index * ENTRY_BYTES
    }

    /// Populate the table from durable storage
    ///
    /// Each record is validated; corrupt records and read failures
    /// both fall back to the default entry. This never fails: a
    /// blank or damaged storage region simply yields an empty table.
    pub fn load<S: ScheduleStorage>(storage: &mut S) -> Self {
        let mut table = Self::new();
        for index in 0..SLOT_COUNT {
            let mut record = [0u8; ENTRY_BYTES];
            if storage.read_at(Self::slot_offset(index), &mut record).is_ok() {
                table.entries[index] = DoseEntry::decode(&record);
            }
        }
        table
    }

    /// Write the whole table to durable storage
    ///
    /// Only called on an explicit setup commit; per-dispense flag
    /// mutations stay in memory to bound wear.
    pub fn save<S: ScheduleStorage>(&self, storage: &mut S) -> Result<(), StorageError> {
        for (index, entry) in self.entries.iter().enumerate() {
            storage.write_at(Self::slot_offset(index), &entry.encode())?;
        }
        Ok(())
    }

    /// Get a slot by index
    pub fn get(&self, index: usize) -> Option<&DoseEntry> {
        self.entries.get(index)
    }

    /// Replace a slot; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, entry: DoseEntry) {
        if let Some(slot) = self.entries.get_mut(index) {
            *slot = entry;
        }
    }

    /// Mark a slot as dispensed for today
    pub fn mark_dispensed(&mut self, index: usize) {
        if let Some(slot) = self.entries.get_mut(index) {
            slot.dispensed_today = true;
        }
    }

    /// Clear every slot's dispensed-today flag (daily rollover)
    ///
    /// Idempotent: safe to call any number of times within the
    /// midnight minute.
    pub fn reset_dispensed_flags(&mut self) {
        for entry in &mut self.entries {
            entry.dispensed_today = false;
        }
    }

    /// All slots in index order
    pub fn entries(&self) -> &[DoseEntry; SLOT_COUNT] {
        &self.entries
    }

    /// Iterate (index, entry) over active slots
    pub fn active_slots(&self) -> impl Iterator<Item = (usize, &DoseEntry)> {
        self.entries.iter().enumerate().filter(|(_, e)| e.active)
    }

    /// Number of active slots
    pub fn active_count(&self) -> usize {
        self.active_slots().count()
    }
}
