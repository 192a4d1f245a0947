//! Audible and visual indicator trait

/// Trait for the buzzer and status LED
pub trait Indicator {
    /// Sound the buzzer
    ///
    /// Blocks for `duration_ms`; only ever called from the main
    /// context, never from an interrupt.
    fn beep(&mut self, freq_hz: u16, duration_ms: u16);

    /// Switch the status LED on or off
    fn led(&mut self, on: bool);
}
