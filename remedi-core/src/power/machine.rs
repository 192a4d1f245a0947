//! Power state machine definition

/// Fatal conditions that park the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// The battery-backed clock cannot be read; time is unreliable
    /// and no dose may be dispensed
    ClockUnavailable,
}

/// Power states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Display on, keypad polled, scheduler running at full cadence
    Active,
    /// CPU halted between interrupts, display powered down
    Sleeping,
    /// Fatal condition; visible message, no recovery
    Fault(FaultKind),
}

/// Events that can trigger power transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerEvent {
    /// The inactivity timeout elapsed outside any modal flow
    InactivityTimeout,
    /// Debounced button edge latched while sleeping
    ButtonWake,
    /// Periodic wake timer fired; `dose_due` is the schedule check
    /// made before touching the display
    PeriodicWake { dose_due: bool },
    /// Fatal condition detected
    FaultDetected(FaultKind),
}

impl PowerState {
    /// Check if this is the fault state
    pub fn is_fault(&self) -> bool {
        matches!(self, PowerState::Fault(_))
    }

    /// Process an event and return the next state
    ///
    /// A periodic wake with nothing due stays in `Sleeping`: the
    /// device never fully wakes unless a dose is due. This is the
    /// core energy-saving contract.
    pub fn transition(self, event: PowerEvent) -> Self {
        use PowerEvent::*;
        use PowerState::*;

        match (self, event) {
            (Active, InactivityTimeout) => Sleeping,
            (Sleeping, ButtonWake) => Active,
            (Sleeping, PeriodicWake { dose_due: true }) => Active,
            (Sleeping, PeriodicWake { dose_due: false }) => Sleeping,
            (Active | Sleeping, FaultDetected(kind)) => Fault(kind),

            // Fault is terminal; everything else stays put.
            _ => self,
        }
    }
}
