//! Power manager
//!
//! Owns the power state and the inactivity countdown. The controller
//! reports activity and elapsed time; the manager says when sleep
//! entry is due. Hardware actions (display power, wake timer, halt)
//! stay with the controller.

use super::machine::{FaultKind, PowerEvent, PowerState};

/// Default inactivity timeout before sleep entry (ms)
pub const SLEEP_TIMEOUT_MS: u32 = 60_000;

/// Sleep/wake decision logic
#[derive(Debug)]
pub struct PowerManager {
    state: PowerState,
    sleep_timeout_ms: u32,
    idle_ms: u32,
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerManager {
    /// Create a manager with the default inactivity timeout
    pub const fn new() -> Self {
        Self::with_timeout(SLEEP_TIMEOUT_MS)
    }

    /// Create a manager with a custom inactivity timeout
    pub const fn with_timeout(sleep_timeout_ms: u32) -> Self {
        Self {
            state: PowerState::Active,
            sleep_timeout_ms,
            idle_ms: 0,
        }
    }

    /// Current power state
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Reset the inactivity countdown (key press or dispense)
    pub fn note_activity(&mut self) {
        self.idle_ms = 0;
    }

    /// Apply an event to the state machine
    pub fn apply(&mut self, event: PowerEvent) -> PowerState {
        self.state = self.state.transition(event);
        if self.state == PowerState::Active {
            self.idle_ms = 0;
        }
        self.state
    }

    /// Enter the fault state
    pub fn fault(&mut self, kind: FaultKind) {
        self.state = self.state.transition(PowerEvent::FaultDetected(kind));
    }

    /// Advance the inactivity countdown
    ///
    /// `inhibited` holds the countdown at zero while a modal flow is
    /// open or a dispense is running. Returns `true` exactly when the
    /// timeout elapses and the state moves to `Sleeping`; the caller
    /// then performs the sleep-entry actions.
    pub fn tick(&mut self, delta_ms: u32, inhibited: bool) -> bool {
        if self.state != PowerState::Active {
            return false;
        }
        if inhibited {
            self.idle_ms = 0;
            return false;
        }

        self.idle_ms = self.idle_ms.saturating_add(delta_ms);
        if self.idle_ms >= self.sleep_timeout_ms {
            self.apply(PowerEvent::InactivityTimeout);
            self.idle_ms = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_triggers_sleep_entry() {
        let mut manager = PowerManager::with_timeout(1000);
        assert!(!manager.tick(999, false));
        assert!(manager.tick(1, false));
        assert_eq!(manager.state(), PowerState::Sleeping);
    }

    #[test]
    fn test_activity_resets_countdown() {
        let mut manager = PowerManager::with_timeout(1000);
        manager.tick(900, false);
        manager.note_activity();
        assert!(!manager.tick(900, false));
        assert_eq!(manager.state(), PowerState::Active);
    }

    #[test]
    fn test_modal_flow_inhibits_sleep() {
        let mut manager = PowerManager::with_timeout(1000);
        for _ in 0..10 {
            assert!(!manager.tick(500, true));
        }
        assert_eq!(manager.state(), PowerState::Active);

        // Countdown restarts from zero once the flow closes.
        assert!(!manager.tick(999, false));
        assert!(manager.tick(1, false));
    }

    #[test]
    fn test_no_countdown_while_sleeping() {
        let mut manager = PowerManager::with_timeout(1000);
        assert!(manager.tick(1000, false));
        assert!(!manager.tick(5000, false));
        assert_eq!(manager.state(), PowerState::Sleeping);
    }

    #[test]
    fn test_wake_resets_countdown() {
        let mut manager = PowerManager::with_timeout(1000);
        manager.tick(1000, false);
        manager.apply(PowerEvent::ButtonWake);
        assert_eq!(manager.state(), PowerState::Active);
        assert!(!manager.tick(999, false));
    }
}
