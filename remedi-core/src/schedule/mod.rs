//! Schedule table and persistence
//!
//! Up to five dose entries, persisted as fixed-size binary records at
//! deterministic offsets. Records are validated on load; a corrupt
//! record is replaced with a deactivated default, never surfaced to
//! the user.

pub mod entry;
pub mod table;

pub use entry::{DoseEntry, ENTRY_BYTES};
pub use table::{ScheduleTable, SLOT_COUNT};
