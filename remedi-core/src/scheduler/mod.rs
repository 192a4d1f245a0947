//! Dose scheduler
//!
//! Decides, once per polling interval while active and once per
//! periodic wake while sleeping, whether any dose is due. Pure
//! functions over the schedule table and a wall-clock reading so the
//! decisions are testable without hardware or real time.

use heapless::Vec;

use crate::schedule::{ScheduleTable, SLOT_COUNT};
use crate::traits::TimeOfDay;

/// Schedule polling cadence while active (ms)
pub const POLL_INTERVAL_MS: u32 = 1000;

/// True during the minute reserved for the daily rollover
pub fn is_rollover_minute(now: &TimeOfDay) -> bool {
    now.hour == 0 && now.minute == 0
}

/// Run the daily rollover, clearing every dispensed-today flag
///
/// Idempotent within the midnight minute; the caller skips dispensing
/// on any cycle where this ran.
pub fn midnight_reset(table: &mut ScheduleTable) {
    table.reset_dispensed_flags();
}

/// True iff some active, not-yet-dispensed entry matches the current
/// (hour, minute), excluding the rollover minute
pub fn medication_due(table: &ScheduleTable, now: &TimeOfDay) -> bool {
    table.entries().iter().any(|e| e.is_due_at(now))
}

/// Slots due right now, in index order
///
/// Every returned slot is dispensed within the same cycle, lowest
/// index first. Empty during the rollover minute.
pub fn due_slots(table: &ScheduleTable, now: &TimeOfDay) -> Vec<u8, SLOT_COUNT> {
    let mut due = Vec::new();
    for (index, entry) in table.entries().iter().enumerate() {
        if entry.is_due_at(now) {
            // Cannot overflow: at most SLOT_COUNT entries exist.
            let _ = due.push(index as u8);
        }
    }
    due
}

/// Minutes until the next dose across all active entries
///
/// Returns `None` when no slot is active. Ties report the minimum;
/// the lowest index wins implicitly through iteration order.
pub fn minutes_to_next(table: &ScheduleTable, now: &TimeOfDay) -> Option<u16> {
    table
        .active_slots()
        .map(|(_, entry)| entry.minutes_until(now))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::DoseEntry;

    fn table_with(entries: &[(usize, DoseEntry)]) -> ScheduleTable {
        let mut table = ScheduleTable::new();
        for (index, entry) in entries {
            table.set(*index, *entry);
        }
        table
    }

    #[test]
    fn test_due_at_exact_minute() {
        let table = table_with(&[(0, DoseEntry::new(8, 0))]);
        let now = TimeOfDay::new(8, 0, 0);

        assert!(medication_due(&table, &now));
        assert_eq!(due_slots(&table, &now).as_slice(), &[0]);
    }

    #[test]
    fn test_not_due_when_already_dispensed() {
        let mut entry = DoseEntry::new(8, 0);
        entry.dispensed_today = true;
        let table = table_with(&[(0, entry)]);

        assert!(!medication_due(&table, &TimeOfDay::new(8, 0, 0)));
        assert!(due_slots(&table, &TimeOfDay::new(8, 0, 0)).is_empty());
    }

    #[test]
    fn test_multiple_due_slots_in_index_order() {
        let table = table_with(&[
            (4, DoseEntry::new(12, 30)),
            (1, DoseEntry::new(12, 30)),
            (2, DoseEntry::new(9, 0)),
        ]);
        let due = due_slots(&table, &TimeOfDay::new(12, 30, 10));
        assert_eq!(due.as_slice(), &[1, 4]);
    }

    #[test]
    fn test_rollover_minute_skips_dispensing() {
        let table = table_with(&[(0, DoseEntry::new(0, 0))]);
        let midnight = TimeOfDay::new(0, 0, 30);

        assert!(is_rollover_minute(&midnight));
        assert!(!medication_due(&table, &midnight));
        assert!(due_slots(&table, &midnight).is_empty());
    }

    #[test]
    fn test_midnight_reset_is_idempotent() {
        let mut entry = DoseEntry::new(8, 0);
        entry.dispensed_today = true;
        let mut table = table_with(&[(0, entry), (1, DoseEntry::new(20, 0))]);

        midnight_reset(&mut table);
        midnight_reset(&mut table);

        assert!(table.entries().iter().all(|e| !e.dispensed_today));
        // Only the flags change; times and activation are untouched.
        assert_eq!(table.get(0).map(|e| (e.hour, e.minute)), Some((8, 0)));
        assert!(table.get(1).is_some_and(|e| e.active));
    }

    #[test]
    fn test_minutes_to_next_across_midnight() {
        let table = table_with(&[(0, DoseEntry::new(0, 10))]);
        assert_eq!(minutes_to_next(&table, &TimeOfDay::new(23, 50, 0)), Some(20));
    }

    #[test]
    fn test_minutes_to_next_reports_minimum() {
        let table = table_with(&[
            (0, DoseEntry::new(18, 0)),
            (1, DoseEntry::new(9, 15)),
            (2, DoseEntry::new(12, 0)),
        ]);
        // 9:00 -> nearest is 9:15
        assert_eq!(minutes_to_next(&table, &TimeOfDay::new(9, 0, 0)), Some(15));
    }

    #[test]
    fn test_minutes_to_next_with_no_active_entries() {
        let table = ScheduleTable::new();
        assert_eq!(minutes_to_next(&table, &TimeOfDay::new(9, 0, 0)), None);
    }

    #[test]
    fn test_missed_minute_is_skipped_for_the_day() {
        // Device slept through 8:00; at 8:01 the dose is no longer due.
        let table = table_with(&[(0, DoseEntry::new(8, 0))]);
        assert!(!medication_due(&table, &TimeOfDay::new(8, 1, 0)));
    }
}
