//! Wall-clock source trait
//!
//! The clock is battery-backed and keeps time across power loss.
//! Doses are never dispensed on unreliable time: a clock failure is
//! fatal and surfaces as a visible fault.

/// Errors that can occur when reading the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The clock did not respond (bus error, missing device)
    Unavailable,
    /// The clock responded with an out-of-range reading
    BadReading,
}

/// A wall-clock time with second resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59
    pub second: u8,
}

impl TimeOfDay {
    /// Create a new time of day
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// Check that all fields are in range
    pub const fn is_valid(&self) -> bool {
        self.hour <= 23 && self.minute <= 59 && self.second <= 59
    }

    /// Minutes elapsed since midnight (0-1439)
    pub const fn minute_of_day(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

/// Trait for the battery-backed real-time clock
pub trait WallClock {
    /// Read the current wall-clock time
    ///
    /// Takes `&mut self` because RTC reads typically go over a bus.
    fn now(&mut self) -> Result<TimeOfDay, ClockError>;
}
