//! Wall clock over the RP2040 RTC
//!
//! The RTC keeps running across the sleep states used here. A stopped
//! RTC reads as `ClockError::Unavailable`, which the controller treats
//! as fatal.

use defmt::warn;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};
use embassy_rp::peripherals::RTC;

use remedi_core::traits::{ClockError, TimeOfDay, WallClock};

pub struct RtcClock {
    rtc: Rtc<'static, RTC>,
}

impl RtcClock {
    /// Wrap the RTC peripheral
    ///
    /// If the RTC is stopped (cold boot without a backup supply) it is
    /// seeded with a placeholder time so the device is usable before
    /// the clock has been set properly.
    pub fn new(mut rtc: Rtc<'static, RTC>) -> Self {
        if !rtc.is_running() {
            warn!("RTC stopped, seeding placeholder time");
            let seed = DateTime {
                year: 2026,
                month: 1,
                day: 1,
                day_of_week: DayOfWeek::Thursday,
                hour: 8,
                minute: 0,
                second: 0,
            };
            if rtc.set_datetime(seed).is_err() {
                warn!("RTC seed rejected");
            }
        }
        Self { rtc }
    }
}

impl WallClock for RtcClock {
    fn now(&mut self) -> Result<TimeOfDay, ClockError> {
        let dt = self.rtc.now().map_err(|_| ClockError::Unavailable)?;
        let time = TimeOfDay::new(dt.hour, dt.minute, dt.second);
        if !time.is_valid() {
            return Err(ClockError::BadReading);
        }
        Ok(time)
    }
}
