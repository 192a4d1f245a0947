//! Wake flags shared with interrupt context
//!
//! The only data crossing the interrupt/main boundary: two wake
//! latches and the last accepted button timestamp. Interrupt handlers
//! do nothing but a debounce check and a store; all consumption is a
//! lock-free read-and-clear (`swap`) from the main context, which on
//! a single core gives the same no-lost/no-duplicated-wake guarantee
//! as an interrupt-masked read-modify-clear bracket.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

/// Minimum interval between accepted button edges (ms)
///
/// An edge inside the window is dropped entirely: not queued, not
/// merged.
pub const DEBOUNCE_MS: u32 = 200;

/// Why the main context woke up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeReason {
    /// Debounced wake-button edge
    Button,
    /// Periodic wake timer
    Watchdog,
}

/// Interrupt-to-main wake signal latches
pub struct WakeFlags {
    button: AtomicBool,
    watchdog: AtomicBool,
    last_button_ms: AtomicU32,
}

impl Default for WakeFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeFlags {
    /// Create cleared flags; `const` so they can live in a `static`
    pub const fn new() -> Self {
        Self {
            button: AtomicBool::new(false),
            watchdog: AtomicBool::new(false),
            // A full debounce window in the past, so the first edge
            // is always accepted.
            last_button_ms: AtomicU32::new(0u32.wrapping_sub(DEBOUNCE_MS)),
        }
    }

    /// Interrupt side: latch a button edge
    ///
    /// Returns `false` when the edge fell inside the debounce window
    /// and was dropped.
    pub fn signal_button(&self, now_ms: u32) -> bool {
        let last = self.last_button_ms.load(Ordering::Acquire);
        if now_ms.wrapping_sub(last) < DEBOUNCE_MS {
            return false;
        }
        self.last_button_ms.store(now_ms, Ordering::Release);
        self.button.store(true, Ordering::Release);
        true
    }

    /// Interrupt side: latch a periodic-timer wake
    pub fn signal_watchdog(&self) {
        self.watchdog.store(true, Ordering::Release);
    }

    /// Main side: consume one pending wake, button first
    ///
    /// Only the returned latch is cleared; a watchdog wake pending
    /// behind a button wake stays latched for the next call.
    pub fn take(&self) -> Option<WakeReason> {
        if self.button.swap(false, Ordering::AcqRel) {
            return Some(WakeReason::Button);
        }
        if self.watchdog.swap(false, Ordering::AcqRel) {
            return Some(WakeReason::Watchdog);
        }
        None
    }

    /// True if any wake is latched (does not consume)
    pub fn pending(&self) -> bool {
        self.button.load(Ordering::Acquire) || self.watchdog.load(Ordering::Acquire)
    }

    /// Main side: drop both latches
    ///
    /// Edges latched while the device was already awake carry no
    /// information; the controller clears them at sleep entry so they
    /// cannot replay as wakes.
    pub fn clear(&self) {
        self.button.store(false, Ordering::Release);
        self.watchdog.store(false, Ordering::Release);
    }
}
