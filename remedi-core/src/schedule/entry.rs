//! Dose entry type and its on-storage codec

use serde::{Deserialize, Serialize};

use crate::traits::TimeOfDay;

/// Size of one persisted entry record in bytes
///
/// Postcard encodes this struct as exactly one byte per field in
/// declaration order: active (0/1), hour, minute, dispensed flag.
/// Slot `i` lives at offset `i * ENTRY_BYTES` of the schedule region.
pub const ENTRY_BYTES: usize = 4;

/// One configured medication time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DoseEntry {
    /// Whether this slot is in use
    pub active: bool,
    /// Dose hour, 0-23
    pub hour: u8,
    /// Dose minute, 0-59
    pub minute: u8,
    /// Whether this dose has already been dispensed today
    pub dispensed_today: bool,
}

impl DoseEntry {
    /// Create an active entry at the given time
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self {
            active: true,
            hour,
            minute,
            dispensed_today: false,
        }
    }

    /// Check the range invariant (hour <= 23, minute <= 59)
    pub const fn is_valid(&self) -> bool {
        self.hour <= 23 && self.minute <= 59
    }

    /// True if this entry should dispense at the given wall time
    ///
    /// The (0,0) minute is reserved for the daily rollover and never
    /// matches; an entry set to midnight dispenses via the next-day
    /// path once the rollover has cleared its flag.
    pub fn is_due_at(&self, now: &TimeOfDay) -> bool {
        self.active
            && !self.dispensed_today
            && self.hour == now.hour
            && self.minute == now.minute
            && !(now.hour == 0 && now.minute == 0)
    }

    /// Minutes until this entry next dispenses
    ///
    /// Same day when not yet dispensed and the time has not passed,
    /// otherwise tomorrow.
    pub fn minutes_until(&self, now: &TimeOfDay) -> u16 {
        const DAY_MINUTES: u16 = 24 * 60;
        let target = self.minute_of_day();
        let current = now.minute_of_day();
        if !self.dispensed_today && target >= current {
            target - current
        } else {
            DAY_MINUTES - current + target
        }
    }

    /// Minutes since midnight for this entry's dose time
    pub const fn minute_of_day(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Encode to the fixed on-storage record
    pub fn encode(&self) -> [u8; ENTRY_BYTES] {
        let mut buf = [0u8; ENTRY_BYTES];
        // Cannot fail: the buffer is sized to the encoding.
        let _ = postcard::to_slice(self, &mut buf);
        buf
    }

    /// Decode a persisted record, substituting the default for a
    /// corrupt one (bad flag bytes or out-of-range time fields)
    pub fn decode(bytes: &[u8; ENTRY_BYTES]) -> Self {
        match postcard::from_bytes::<DoseEntry>(bytes) {
            Ok(entry) if entry.is_valid() => entry,
            _ => DoseEntry::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_record_layout() {
        let entry = DoseEntry {
            active: true,
            hour: 8,
            minute: 30,
            dispensed_today: false,
        };
        assert_eq!(entry.encode(), [1, 8, 30, 0]);
    }

    #[test]
    fn test_roundtrip() {
        let entry = DoseEntry::new(21, 45);
        assert_eq!(DoseEntry::decode(&entry.encode()), entry);
    }

    #[test]
    fn test_corrupt_hour_resets_to_default() {
        // hour 24 is out of range
        let decoded = DoseEntry::decode(&[1, 24, 0, 0]);
        assert_eq!(decoded, DoseEntry::default());
        assert!(!decoded.active);
    }

    #[test]
    fn test_corrupt_flag_resets_to_default() {
        // 0xFF is not a valid bool encoding
        assert_eq!(DoseEntry::decode(&[0xFF, 8, 0, 0]), DoseEntry::default());
    }

    #[test]
    fn test_due_matching() {
        let entry = DoseEntry::new(8, 0);
        assert!(entry.is_due_at(&TimeOfDay::new(8, 0, 0)));
        assert!(entry.is_due_at(&TimeOfDay::new(8, 0, 59)));
        assert!(!entry.is_due_at(&TimeOfDay::new(8, 1, 0)));

        let mut taken = entry;
        taken.dispensed_today = true;
        assert!(!taken.is_due_at(&TimeOfDay::new(8, 0, 0)));

        let mut inactive = entry;
        inactive.active = false;
        assert!(!inactive.is_due_at(&TimeOfDay::new(8, 0, 0)));
    }

    #[test]
    fn test_midnight_minute_never_matches() {
        let entry = DoseEntry::new(0, 0);
        assert!(!entry.is_due_at(&TimeOfDay::new(0, 0, 30)));
    }

    #[test]
    fn test_minutes_until_wraps_to_next_day() {
        // 23:50 now, dose at 00:10 -> 20 minutes
        let entry = DoseEntry::new(0, 10);
        assert_eq!(entry.minutes_until(&TimeOfDay::new(23, 50, 0)), 20);
    }

    #[test]
    fn test_minutes_until_same_day() {
        let entry = DoseEntry::new(9, 30);
        assert_eq!(entry.minutes_until(&TimeOfDay::new(8, 0, 0)), 90);
        assert_eq!(entry.minutes_until(&TimeOfDay::new(9, 30, 0)), 0);
    }

    #[test]
    fn test_minutes_until_dispensed_goes_to_tomorrow() {
        let mut entry = DoseEntry::new(9, 30);
        entry.dispensed_today = true;
        // Already taken, so the next occurrence is 9:30 tomorrow.
        assert_eq!(entry.minutes_until(&TimeOfDay::new(8, 0, 0)), 24 * 60 + 90);
    }

    proptest! {
        /// Decoding any 4-byte record yields an entry satisfying the
        /// range invariant.
        #[test]
        fn prop_decoded_entries_are_valid(bytes in proptest::array::uniform4(any::<u8>())) {
            let entry = DoseEntry::decode(&bytes);
            prop_assert!(entry.is_valid());
        }

        /// Well-formed entries survive a storage round trip.
        #[test]
        fn prop_valid_entries_roundtrip(
            active in any::<bool>(),
            hour in 0u8..24,
            minute in 0u8..60,
            dispensed in any::<bool>(),
        ) {
            let entry = DoseEntry { active, hour, minute, dispensed_today: dispensed };
            prop_assert_eq!(DoseEntry::decode(&entry.encode()), entry);
        }
    }
}
