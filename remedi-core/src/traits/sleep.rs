//! Low-power control trait
//!
//! The sleep-entry and wake protocol is decided by the power manager;
//! this trait is how the decisions reach the hardware. `halt` blocks
//! until any interrupt fires, after which the main context inspects
//! the wake flags and either resumes or halts again.

/// Trait for CPU halt and wake-timer control
pub trait SleepControl {
    /// Arm the periodic wake timer (~8 s period)
    fn arm_periodic_wake(&mut self);

    /// Disarm the periodic wake timer
    fn disarm_periodic_wake(&mut self);

    /// Power down non-essential peripherals for sleep
    fn peripherals_off(&mut self);

    /// Restore peripherals after wake
    fn peripherals_on(&mut self);

    /// Enter the CPU low-power state
    ///
    /// Returns after the next interrupt (button edge or wake timer).
    fn halt(&mut self);
}
