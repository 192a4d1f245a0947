//! Sleep and wake plumbing
//!
//! The periodic wake source is a timer task in main.rs gated by an
//! atomic arm flag; `halt` parks the core on WFE until the next
//! interrupt (button edge or timer tick).

use portable_atomic::{AtomicBool, Ordering};

use embassy_rp::gpio::Output;

use remedi_core::traits::SleepControl;

pub struct RpSleep {
    armed: &'static AtomicBool,
    /// High-side switch for the gate drivers and keypad pull-ups
    rail: Output<'static>,
}

impl RpSleep {
    pub fn new(armed: &'static AtomicBool, mut rail: Output<'static>) -> Self {
        rail.set_high();
        Self { armed, rail }
    }
}

impl SleepControl for RpSleep {
    fn arm_periodic_wake(&mut self) {
        self.armed.store(true, Ordering::Release);
    }

    fn disarm_periodic_wake(&mut self) {
        self.armed.store(false, Ordering::Release);
    }

    fn peripherals_off(&mut self) {
        self.rail.set_low();
    }

    fn peripherals_on(&mut self) {
        self.rail.set_high();
    }

    fn halt(&mut self) {
        cortex_m::asm::wfe();
    }
}
